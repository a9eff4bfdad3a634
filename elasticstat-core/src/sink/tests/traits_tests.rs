use crate::sink::{Sink, SinkError};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Collect {
    seen: Vec<u32>,
    fail: bool,
}

impl Sink<u32> for Collect {
    fn emit(&mut self, record: &u32) -> Result<(), SinkError> {
        self.seen.push(*record);
        if self.fail {
            return Err(SinkError::io(std::io::Error::other("down")));
        }
        Ok(())
    }
}

#[test]
fn pair_delivers_to_both_even_when_first_fails() {
    // Arrange
    let mut pair = (
        Collect {
            fail: true,
            ..Collect::default()
        },
        Collect::default(),
    );

    // Act
    let result = pair.emit(&7u32);

    // Assert
    assert!(result.is_err());
    assert_eq!(pair.0.seen, vec![7]);
    assert_eq!(pair.1.seen, vec![7]);
}

#[test]
fn absent_sink_accepts_everything() {
    // Arrange
    let mut sink: Option<Collect> = None;

    // Act / Assert
    assert!(sink.emit(&1u32).is_ok());
    assert!(Sink::<u32>::flush(&mut sink).is_ok());
}

#[test]
fn present_optional_sink_forwards() {
    // Arrange
    let mut sink = Some(Collect::default());

    // Act
    sink.emit(&3u32).unwrap();

    // Assert
    assert_eq!(sink.unwrap().seen, vec![3]);
}
