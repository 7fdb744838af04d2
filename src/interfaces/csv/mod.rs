pub mod submission_reader;
