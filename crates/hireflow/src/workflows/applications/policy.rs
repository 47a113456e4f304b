use super::domain::ApplicationStatus;

/// Which status changes a recruiter may make before an application is decided.
///
/// Both policies forbid leaving ACCEPTED or REJECTED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// APPLIED → IN_REVIEW → {ACCEPTED, REJECTED}, with APPLIED → {ACCEPTED, REJECTED}.
    #[default]
    ForwardOnly,
    /// Any different status from a non-terminal one, including IN_REVIEW → APPLIED.
    AnyBeforeTerminal,
}

impl TransitionPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "forward_only" | "strict" => Some(Self::ForwardOnly),
            "any_before_terminal" | "lenient" => Some(Self::AnyBeforeTerminal),
            _ => None,
        }
    }

    pub fn permits(self, from: ApplicationStatus, to: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        if from.is_terminal() || from == to {
            return false;
        }
        match self {
            TransitionPolicy::AnyBeforeTerminal => true,
            TransitionPolicy::ForwardOnly => matches!(
                (from, to),
                (Applied, InReview)
                    | (Applied, Accepted)
                    | (Applied, Rejected)
                    | (InReview, Accepted)
                    | (InReview, Rejected)
            ),
        }
    }

    /// Statuses reachable from `from`, in declaration order.
    pub fn targets(self, from: ApplicationStatus) -> Vec<ApplicationStatus> {
        ApplicationStatus::ALL
            .into_iter()
            .filter(|to| self.permits(from, *to))
            .collect()
    }
}
