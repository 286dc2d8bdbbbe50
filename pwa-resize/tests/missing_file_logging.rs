//! Missing files are reported through the status line, not the log.

use log::{Level, Log, Metadata, Record};
use pwa_resize::{JobTable, RunOptions};

use std::sync::Mutex;

struct Recorder(Mutex<Vec<(Level, String)>>);

impl Log for Recorder {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static RECORDER: Recorder = Recorder(Mutex::new(Vec::new()));

#[test]
fn missing_files_only_log_at_debug() {
    log::set_logger(&RECORDER).unwrap();
    log::set_max_level(log::LevelFilter::Trace);

    let dir = tempfile::tempdir().unwrap();
    let reports =
        pwa_resize::run(dir.path(), &JobTable::default(), &RunOptions::default(), |_| {})
            .unwrap();
    assert!(reports.iter().all(|r| r.is_missing()));

    let records = RECORDER.0.lock().unwrap();
    let skipped: Vec<_> = records
        .iter()
        .filter(|(_, msg)| msg.contains("does not exist"))
        .collect();

    assert_eq!(skipped.len(), 2);
    assert!(skipped.iter().all(|(level, _)| *level == Level::Debug));
    assert!(records.iter().all(|(level, _)| *level > Level::Warn));
}
