/// Step-by-step account of a dictation request, returned to the caller next
/// to the result and mirrored to tracing.
#[derive(Debug, Default, Clone)]
pub struct FlowLog {
    entries: Vec<String>,
}

impl FlowLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!(step = self.entries.len(), "{}", entry);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}
