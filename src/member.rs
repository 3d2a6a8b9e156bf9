use crate::error::{MetricError, MetricResult};

const MSG_SHARE:         &str = "percentage must be on the interval [0, 1]";
const MSG_NEGATIVE_DONE: &str = "tickets completed must be non negative";
const MSG_EXCEEDS:       &str = "tickets completed cannot exceed tickets assigned";
const MSG_ASSIGNED:      &str = "tickets assigned must be positive";

/// One group member's contribution data.
///
/// Validated once at construction and immutable afterwards. The only way to
/// obtain a `Member` with a different share is [`Member::with_share`], which
/// re-runs the share check.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    share: f64,
    tickets_completed: u32,
    tickets_assigned: u32,
    name: String,
}

impl Member {
    /// Builds a member, rejecting any field outside its domain.
    pub fn new(
        share:             f64,
        tickets_completed: u32,
        tickets_assigned:  u32,
        name:              impl Into<String>,
    ) -> MetricResult<Self> {
        check_share(share)?;
        if tickets_assigned == 0 {
            return Err(MetricError::Validation(MSG_ASSIGNED.to_string()));
        }
        if tickets_completed > tickets_assigned {
            return Err(MetricError::Validation(MSG_EXCEEDS.to_string()));
        }
        Ok(Member { share, tickets_completed, tickets_assigned, name: name.into() })
    }

    /// Same as [`Member::new`] for callers holding signed counts.
    pub fn from_signed(
        share:             f64,
        tickets_completed: i64,
        tickets_assigned:  i64,
        name:              impl Into<String>,
    ) -> MetricResult<Self> {
        check_share(share)?;
        let assigned = u32::try_from(tickets_assigned)
            .ok()
            .filter(|&a| a > 0)
            .ok_or_else(|| MetricError::Validation(MSG_ASSIGNED.to_string()))?;
        if tickets_completed < 0 {
            return Err(MetricError::Validation(MSG_NEGATIVE_DONE.to_string()));
        }
        let completed = u32::try_from(tickets_completed)
            .map_err(|_| MetricError::Validation(MSG_EXCEEDS.to_string()))?;
        Member::new(share, completed, assigned, name)
    }

    /// Returns a copy carrying `share`, validated.
    pub fn with_share(self, share: f64) -> MetricResult<Self> {
        check_share(share)?;
        Ok(Member { share, ..self })
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Member { name: name.into(), ..self }
    }

    pub fn share(&self) -> f64 { self.share }
    pub fn tickets_completed(&self) -> u32 { self.tickets_completed }
    pub fn tickets_assigned(&self) -> u32 { self.tickets_assigned }
    pub fn name(&self) -> &str { &self.name }
}

/// Placeholder used while ingesting: share 0, 0 of 1 tickets, empty name.
impl Default for Member {
    fn default() -> Self {
        Member { share: 0.0, tickets_completed: 0, tickets_assigned: 1, name: String::new() }
    }
}

fn check_share(share: f64) -> MetricResult<()> {
    // NaN fails both comparisons, so test containment rather than exclusion
    if (0.0..=1.0).contains(&share) {
        Ok(())
    } else {
        Err(MetricError::Validation(MSG_SHARE.to_string()))
    }
}

/// Extracts the shares vector of a group, preserving member order.
pub fn shares(group: &[Member]) -> Vec<f64> {
    group.iter().map(Member::share).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(r: MetricResult<Member>) -> String {
        match r {
            Err(MetricError::Validation(msg)) => msg,
            other => panic!("Expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_member_keeps_fields() {
        let m = Member::new(0.25, 3, 4, "ada").expect("valid member");
        assert_eq!(m.share(), 0.25);
        assert_eq!(m.tickets_completed(), 3);
        assert_eq!(m.tickets_assigned(), 4);
        assert_eq!(m.name(), "ada");
    }

    #[test]
    fn test_default_is_placeholder() {
        let m = Member::default();
        assert_eq!(m.share(), 0.0);
        assert_eq!(m.tickets_completed(), 0);
        assert_eq!(m.tickets_assigned(), 1);
        assert_eq!(m.name(), "");
    }

    #[test]
    fn test_share_bounds_are_inclusive() {
        assert!(Member::new(0.0, 0, 1, "").is_ok(), "0.0 is on the interval");
        assert!(Member::new(1.0, 0, 1, "").is_ok(), "1.0 is on the interval");
    }

    #[test]
    fn test_share_out_of_range_rejected() {
        for bad in [-0.01, 1.0001, f64::NAN, f64::INFINITY] {
            assert_eq!(
                reason(Member::new(bad, 0, 1, "")),
                "percentage must be on the interval [0, 1]",
                "share {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_assigned_rejected() {
        assert_eq!(reason(Member::new(0.5, 0, 0, "")), "tickets assigned must be positive");
    }

    #[test]
    fn test_completed_exceeding_assigned_rejected() {
        assert_eq!(
            reason(Member::new(0.5, 5, 4, "")),
            "tickets completed cannot exceed tickets assigned"
        );
    }

    #[test]
    fn test_signed_negative_completed_rejected() {
        assert_eq!(
            reason(Member::from_signed(0.5, -1, 4, "")),
            "tickets completed must be non negative"
        );
    }

    #[test]
    fn test_signed_non_positive_assigned_rejected() {
        assert_eq!(reason(Member::from_signed(0.5, 0, 0, "")), "tickets assigned must be positive");
        assert_eq!(reason(Member::from_signed(0.5, 0, -3, "")), "tickets assigned must be positive");
    }

    #[test]
    fn test_signed_valid_matches_unsigned() {
        let a = Member::from_signed(0.4, 2, 5, "x").expect("valid");
        let b = Member::new(0.4, 2, 5, "x").expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_with_share_revalidates() {
        let m = Member::default().with_name("bo");
        let m = m.with_share(0.75).expect("0.75 is valid");
        assert_eq!(m.share(), 0.75);
        assert_eq!(m.name(), "bo", "name must survive with_share");
        assert!(Member::default().with_share(2.0).is_err(), "2.0 must be rejected");
    }

    #[test]
    fn test_shares_preserves_order() {
        let group = vec![
            Member::new(0.1, 0, 1, "a").unwrap(),
            Member::new(0.9, 0, 1, "b").unwrap(),
        ];
        assert_eq!(shares(&group), vec![0.1, 0.9]);
    }
}
