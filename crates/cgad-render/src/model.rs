#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableResult {
    pub name: String,
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    /// Model path as given on the command line.
    pub model: String,
    /// State path as given on the command line.
    pub state: String,
    /// Results in declared order.
    pub results: Vec<RenderableResult>,
}

impl RenderableReport {
    pub fn violated(&self) -> usize {
        self.results.iter().filter(|r| !r.ok).count()
    }
}
