use licita_core::ConformityVerdict;
use serde::Serialize;

/// Running verdict counters
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct VerdictStatistics {
    pub total: usize,
    pub conforme: usize,
    pub nao_conforme: usize,
    pub revisao: usize,
}

impl VerdictStatistics {
    pub fn record(&mut self, verdict: ConformityVerdict) {
        self.total += 1;
        match verdict {
            ConformityVerdict::Conforme => self.conforme += 1,
            ConformityVerdict::NaoConforme => self.nao_conforme += 1,
            ConformityVerdict::Revisao => self.revisao += 1,
        }
    }

    /// Share of conforme verdicts, 0 when nothing was analyzed
    pub fn compliance_rate(&self) -> f32 {
        ratio(self.conforme, self.total)
    }

    pub fn review_rate(&self) -> f32 {
        ratio(self.revisao, self.total)
    }
}

fn ratio(part: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        part as f32 / total as f32
    }
}
