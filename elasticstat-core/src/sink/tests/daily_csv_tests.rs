use crate::filter::SlowSearch;
use crate::sink::{DailyCsvWriter, Sink, SinkError};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn search(timestamp: &str, response_time_ms: u64) -> SlowSearch {
    SlowSearch {
        timestamp: timestamp.to_string(),
        response_time_ms,
        indices: vec!["logs".to_string(), "event".to_string()],
    }
}

#[test]
fn records_land_in_the_file_of_their_date() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut writer = DailyCsvWriter::new(dir.path(), "slow");

    // Act
    writer.emit(&search("2014-11-21T23:59:59.000Z", 1200)).unwrap();
    writer.emit(&search("2014-11-22T00:00:01.000Z", 3400)).unwrap();
    writer.emit(&search("2014-11-22T00:10:00.000Z", 5600)).unwrap();
    Sink::<SlowSearch>::flush(&mut writer).unwrap();

    // Assert
    assert_eq!(
        fs::read_to_string(dir.path().join("slow-2014-11-21.csv")).unwrap(),
        "2014-11-21T23:59:59.000Z;1200;logs,event\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("slow-2014-11-22.csv")).unwrap(),
        "2014-11-22T00:00:01.000Z;3400;logs,event\n2014-11-22T00:10:00.000Z;5600;logs,event\n"
    );
    assert_eq!(
        writer.current_date(),
        NaiveDate::from_ymd_opt(2014, 11, 22)
    );
}

#[test]
fn existing_files_are_appended_to() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("slow-2014-11-21.csv");
    fs::write(&path, "earlier;1;x\n").unwrap();
    let mut writer = DailyCsvWriter::new(dir.path(), "slow");

    // Act
    writer.emit(&search("2014-11-21T10:00:00.000Z", 7)).unwrap();
    Sink::<SlowSearch>::flush(&mut writer).unwrap();

    // Assert
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "earlier;1;x\n2014-11-21T10:00:00.000Z;7;logs,event\n"
    );
}

#[test]
fn missing_directory_is_created() {
    // Arrange
    let dir = tempdir().unwrap();
    let nested = dir.path().join("csv").join("slow");
    let mut writer = DailyCsvWriter::new(&nested, "search");

    // Act
    writer.emit(&search("2014-11-21T10:00:00.000Z", 7)).unwrap();
    Sink::<SlowSearch>::flush(&mut writer).unwrap();

    // Assert
    assert!(nested.join("search-2014-11-21.csv").is_file());
}

#[test]
fn undated_timestamps_are_rejected() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut writer = DailyCsvWriter::new(dir.path(), "slow");

    // Act
    let result = writer.emit(&search("yesterday", 7));

    // Assert
    assert!(matches!(result, Err(SinkError::InvalidTimestamp { .. })));
    assert_eq!(writer.current_date(), None);
}

#[test]
fn lines_are_on_disk_without_an_explicit_flush() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut writer = DailyCsvWriter::new(dir.path(), "slow");

    // Act
    writer.emit(&search("2014-11-21T10:00:00.000Z", 7)).unwrap();

    // Assert
    assert_eq!(
        fs::read_to_string(dir.path().join("slow-2014-11-21.csv")).unwrap(),
        "2014-11-21T10:00:00.000Z;7;logs,event\n"
    );
}

#[test]
fn returning_to_an_earlier_date_reopens_its_file() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut writer = DailyCsvWriter::new(dir.path(), "slow");

    // Act
    writer.emit(&search("2014-11-21T23:59:58.000Z", 1)).unwrap();
    writer.emit(&search("2014-11-22T00:00:01.000Z", 2)).unwrap();
    writer.emit(&search("2014-11-21T23:59:59.000Z", 3)).unwrap();

    // Assert
    assert_eq!(
        fs::read_to_string(dir.path().join("slow-2014-11-21.csv")).unwrap(),
        "2014-11-21T23:59:58.000Z;1;logs,event\n2014-11-21T23:59:59.000Z;3;logs,event\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("slow-2014-11-22.csv")).unwrap(),
        "2014-11-22T00:00:01.000Z;2;logs,event\n"
    );
    assert_eq!(
        writer.current_date(),
        NaiveDate::from_ymd_opt(2014, 11, 21)
    );
}
