use crate::error::{MetricError, MetricResult};
use crate::member::{shares, Member};
use crate::stats::{mean, sample_std_dev};
use crate::types::MemberScore;

/// How many sample standard deviations `shares[index]` sits from the group mean.
///
/// Uses the unbiased (n−1) standard deviation. Degenerate spreads are not
/// errors:
/// - a group of one has σ = 0 and a zero numerator, so the result is the IEEE
///   `0/0` sentinel, `NaN`;
/// - a larger group where every share is identical returns exactly `0.0`, since
///   every member sits on the mean.
pub fn blame_metric(shares: &[f64], index: usize) -> MetricResult<f64> {
    let Some(&own) = shares.get(index) else {
        return Err(MetricError::Index { index, len: shares.len() });
    };

    if shares.len() > 1 && shares.iter().all(|&s| s == own) {
        return Ok(0.0);
    }

    Ok((own - mean(shares)) / sample_std_dev(shares))
}

/// Tickets assigned over tickets completed.
///
/// Larger means fewer tickets finished relative to the load; a member who has
/// completed none scores `+inf`.
pub fn ticket_metric(member: &Member) -> f64 {
    member.tickets_assigned() as f64 / member.tickets_completed() as f64
}

/// Scores every member of a group against the group's own shares.
pub fn score_group(group: &[Member]) -> Vec<MemberScore> {
    let shares = shares(group);
    group.iter().enumerate().map(|(i, member)| {
        // index always in range: it comes from enumerating the same group
        let blame = blame_metric(&shares, i).unwrap_or(f64::NAN);
        MemberScore {
            name:  member.name().to_string(),
            share: member.share(),
            blame,
        }
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::csv_parser::parse_group;

    #[test]
    fn test_two_member_known_values() {
        let shares = [0.25, 0.75];
        let a = blame_metric(&shares, 0).unwrap();
        let b = blame_metric(&shares, 1).unwrap();
        let expected = std::f64::consts::FRAC_1_SQRT_2;
        assert!((b - expected).abs() < 1e-9, "Expected {expected:.4}, got {b:.4}");
        assert!((a + expected).abs() < 1e-9, "Expected -{expected:.4}, got {a:.4}");
    }

    #[test]
    fn test_two_member_symmetry_holds_generally() {
        for s in [0.0, 0.1, 0.33, 0.49, 0.9] {
            let shares = [s, 1.0 - s];
            let a = blame_metric(&shares, 0).unwrap();
            let b = blame_metric(&shares, 1).unwrap();
            assert!((a + b).abs() < 1e-9, "Scores for {shares:?} should be opposite: {a} vs {b}");
        }
    }

    #[test]
    fn test_identical_shares_score_zero() {
        for n in [2, 3, 4, 7] {
            let shares = vec![1.0 / n as f64; n];
            for i in 0..n {
                assert_eq!(blame_metric(&shares, i).unwrap(), 0.0, "n={n}, i={i}");
            }
        }
    }

    #[test]
    fn test_single_member_is_nan_sentinel() {
        let score = blame_metric(&[1.0], 0).expect("single member is not an error");
        assert!(score.is_nan(), "0/0 should surface as NaN, got {score}");
    }

    #[test]
    fn test_index_out_of_bounds() {
        assert_eq!(
            blame_metric(&[0.5, 0.5], 2),
            Err(MetricError::Index { index: 2, len: 2 })
        );
        assert_eq!(blame_metric(&[], 0), Err(MetricError::Index { index: 0, len: 0 }));
    }

    #[test]
    fn test_blame_is_deterministic() {
        let shares = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(blame_metric(&shares, 3), blame_metric(&shares, 3));
    }

    #[test]
    fn test_largest_share_scores_highest() {
        let shares = [0.1, 0.6, 0.2, 0.1];
        let scores: Vec<f64> = (0..4).map(|i| blame_metric(&shares, i).unwrap()).collect();
        assert!(scores[1] > scores[2] && scores[2] > scores[0], "Scores out of order: {scores:?}");
        assert_eq!(scores[0], scores[3], "Equal shares should get equal scores");
    }

    #[test]
    fn test_ticket_metric_ratio_direction() {
        let full = Member::new(0.5, 4, 4, "").unwrap();
        assert_eq!(ticket_metric(&full), 1.0);
        let half = Member::new(0.5, 2, 4, "").unwrap();
        assert_eq!(ticket_metric(&half), 2.0, "assigned over completed, not the reverse");
    }

    #[test]
    fn test_ticket_metric_zero_completed_is_infinity() {
        let none = Member::new(0.5, 0, 4, "").unwrap();
        assert_eq!(ticket_metric(&none), f64::INFINITY);
        assert_eq!(ticket_metric(&Member::default()), f64::INFINITY);
    }

    #[test]
    fn test_score_group_from_csv() {
        let group = parse_group("A,1\nB,3\n").unwrap();
        let scores = score_group(&group);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].name, "A");
        assert_eq!(scores[1].share, 0.75);
        assert!((scores[0].blame + 0.7071).abs() < 1e-4);
        assert!((scores[1].blame - 0.7071).abs() < 1e-4);
    }

    #[test]
    fn test_score_group_empty() {
        assert!(score_group(&[]).is_empty());
    }
}
