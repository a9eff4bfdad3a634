use crate::sink::SinkError;

/// Consumer of derived records.
pub trait Sink<R> {
    fn emit(&mut self, record: &R) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<R, S: Sink<R> + ?Sized> Sink<R> for &mut S {
    fn emit(&mut self, record: &R) -> Result<(), SinkError> {
        (**self).emit(record)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

impl<R, S: Sink<R> + ?Sized> Sink<R> for Box<S> {
    fn emit(&mut self, record: &R) -> Result<(), SinkError> {
        (**self).emit(record)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// Absent sinks accept everything.
impl<R, S: Sink<R>> Sink<R> for Option<S> {
    fn emit(&mut self, record: &R) -> Result<(), SinkError> {
        match self {
            Some(sink) => sink.emit(record),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        match self {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

/// Fans a record out to both sinks. The second sink still receives the
/// record when the first one fails; the first error is returned.
impl<R, A: Sink<R>, B: Sink<R>> Sink<R> for (A, B) {
    fn emit(&mut self, record: &R) -> Result<(), SinkError> {
        let first = self.0.emit(record);
        let second = self.1.emit(record);
        first.and(second)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        let first = self.0.flush();
        let second = self.1.flush();
        first.and(second)
    }
}
