/// Column order of a stream row:
/// `PCP,StreamName,StreamType,SourceNode,DestinationNode,Size,Period,Deadline`.
pub const STREAM_FIELDS: [&str; 8] = ["PCP", "StreamName", "StreamType", "SourceNode", "DestinationNode", "Size", "Period", "Deadline"];

/// One raw row of a stream description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecordDto {
    pub line: Option<u64>,
    pub fields: Vec<String>,
}

impl StreamRecordDto {
    pub fn new(line: Option<u64>, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn from_fields(fields: &[&str]) -> Self {
        Self { line: None, fields: fields.iter().map(|f| f.trim().to_string()).collect() }
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.trim()).filter(|f| !f.is_empty())
    }

    /// A header row is recognised by a non-numeric priority column.
    pub fn looks_like_header(&self) -> bool {
        match self.field(0) {
            Some(pcp) => pcp.parse::<i64>().is_err(),
            None => false,
        }
    }
}
