/// Tag in the first column of a topology row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyRecordKind {
    Switch,
    EndSystem,
    Link,
    Unknown,
}

/// One raw row of a topology description, e.g. `SW,SW1,4,domain1` or
/// `LINK,L1,ES1,1,SW1,1,domain1`.
///
/// Fields are kept as text; parsing and validation happen when the record is applied
/// to a `NetworkTopology`, so a bad row can be skipped without aborting the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyRecordDto {
    /// 1-based line number in the source, if known.
    pub line: Option<u64>,
    pub fields: Vec<String>,
}

impl TopologyRecordDto {
    pub fn new(line: Option<u64>, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn from_fields(fields: &[&str]) -> Self {
        Self { line: None, fields: fields.iter().map(|f| f.trim().to_string()).collect() }
    }

    pub fn kind(&self) -> TopologyRecordKind {
        match self.fields.first().map(|f| f.trim().to_ascii_uppercase()).as_deref() {
            Some("SW") => TopologyRecordKind::Switch,
            Some("ES") => TopologyRecordKind::EndSystem,
            Some("LINK") => TopologyRecordKind::Link,
            _ => TopologyRecordKind::Unknown,
        }
    }

    /// Returns the trimmed field at `index`, treating blank cells as absent.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.trim()).filter(|f| !f.is_empty())
    }
}
