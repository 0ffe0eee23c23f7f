pub mod csv_io;

pub use csv_io::{ParsedCsv, ParticipantRow, PrizeRow, export_results, parse_participants, parse_prizes};
