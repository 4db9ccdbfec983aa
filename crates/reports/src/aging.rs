//! Aging buckets for outstanding receivables.
//!
//! An invoice is aged by the number of days between its date and now. The
//! buckets are ordered and each one owns an inclusive upper bound, the last
//! one is open ended. The same table drives both [`AgingBucket::classify`]
//! and the SQL rendered for the outstanding report.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgingBucket {
    UpTo30,
    UpTo60,
    UpTo90,
    Over90,
}

impl AgingBucket {
    /// Buckets in evaluation order.
    pub const ALL: [AgingBucket; 4] = [
        AgingBucket::UpTo30,
        AgingBucket::UpTo60,
        AgingBucket::UpTo90,
        AgingBucket::Over90,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgingBucket::UpTo30 => "0-30 days",
            AgingBucket::UpTo60 => "31-60 days",
            AgingBucket::UpTo90 => "61-90 days",
            AgingBucket::Over90 => "90+ days",
        }
    }

    /// Inclusive upper bound in days, `None` for the catch-all bucket.
    pub fn max_days(self) -> Option<i64> {
        match self {
            AgingBucket::UpTo30 => Some(30),
            AgingBucket::UpTo60 => Some(60),
            AgingBucket::UpTo90 => Some(90),
            AgingBucket::Over90 => None,
        }
    }

    /// 1-based position used to order report rows.
    pub fn rank(self) -> usize {
        Self::ALL
            .iter()
            .position(|b| *b == self)
            .map_or(Self::ALL.len(), |i| i + 1)
    }

    pub fn classify(days: i64) -> Self {
        Self::ALL
            .into_iter()
            .find(|b| b.max_days().is_none_or(|max| days <= max))
            .unwrap_or(AgingBucket::Over90)
    }

    /// Renders the `CASE` expression classifying `age_expr` (an SQL
    /// expression yielding days) into bucket labels.
    pub fn case_sql(age_expr: &str) -> String {
        let mut sql = String::from("CASE\n");
        for bucket in Self::ALL {
            match bucket.max_days() {
                Some(max) => sql.push_str(&format!(
                    "        WHEN {} <= {} THEN '{}'\n",
                    age_expr,
                    max,
                    bucket.label()
                )),
                None => sql.push_str(&format!("        ELSE '{}'\n", bucket.label())),
            }
        }
        sql.push_str("      END");
        sql
    }

    /// Renders an `ORDER BY` expression sorting `column` (holding labels)
    /// by bucket rank.
    pub fn rank_sql(column: &str) -> String {
        let mut sql = format!("CASE {}\n", column);
        for bucket in Self::ALL {
            if bucket.max_days().is_some() {
                sql.push_str(&format!(
                    "        WHEN '{}' THEN {}\n",
                    bucket.label(),
                    bucket.rank()
                ));
            } else {
                sql.push_str(&format!("        ELSE {}\n", bucket.rank()));
            }
        }
        sql.push_str("      END");
        sql
    }
}
