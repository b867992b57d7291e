#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum ReadingStatus {
    #[serde(rename = "Want to read")]
    WantToRead,

    #[serde(rename = "Currently reading")]
    CurrentlyReading,

    #[serde(rename = "Read")]
    Read,
}

/// The user looking at a discussion, along with how far they got in the book
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reader {
    pub reading_status: ReadingStatus,
    pub progress_percentage: u8,
}

impl Reader {
    pub fn new(reading_status: ReadingStatus, progress_percentage: u8) -> Reader {
        Reader {
            reading_status,
            progress_percentage,
        }
    }

    pub fn finished() -> Reader {
        Reader::new(ReadingStatus::Read, 100)
    }
}
