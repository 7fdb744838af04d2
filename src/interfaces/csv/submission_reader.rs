use crate::domain::submission::Submission;
use crate::error::{QuizError, Result};
use std::io::Read;

/// Reads answer submissions from a CSV source with the header
/// `room, round, player, chosen`.
pub struct SubmissionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SubmissionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes submissions; a malformed row yields an `Err`
    /// without ending the stream.
    pub fn submissions(self) -> impl Iterator<Item = Result<Submission>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(QuizError::from))
    }
}
