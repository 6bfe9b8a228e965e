use cgad_types::{ResultRecord, VerdictCounts, VerdictStatus};

#[derive(Clone, Debug)]
pub struct DomainReport {
    /// Results in declared model order.
    pub results: Vec<ResultRecord>,
    pub verdict: VerdictStatus,
    pub counts: VerdictCounts,
}

impl DomainReport {
    pub fn all_satisfied(&self) -> bool {
        self.verdict == VerdictStatus::Pass
    }
}
