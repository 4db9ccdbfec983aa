//! Customer revenue tiers.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Vip,
    Premium,
    Standard,
    New,
}

impl Segment {
    /// Tiers in evaluation order, highest first.
    pub const ALL: [Segment; 4] = [
        Segment::Vip,
        Segment::Premium,
        Segment::Standard,
        Segment::New,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Segment::Vip => "VIP (>1M)",
            Segment::Premium => "Premium (500K-1M)",
            Segment::Standard => "Standard (100K-500K)",
            Segment::New => "New (<100K)",
        }
    }

    /// Exclusive lower bound on total revenue; a customer must be strictly
    /// above it to enter the tier. `None` for the catch-all tier.
    pub fn floor(self) -> Option<i64> {
        match self {
            Segment::Vip => Some(1_000_000),
            Segment::Premium => Some(500_000),
            Segment::Standard => Some(100_000),
            Segment::New => None,
        }
    }

    pub fn classify(total_revenue: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.floor().is_none_or(|floor| total_revenue > floor as f64))
            .unwrap_or(Segment::New)
    }

    /// Renders the `CASE` expression classifying `revenue_expr` into tier
    /// labels.
    pub fn case_sql(revenue_expr: &str) -> String {
        let mut sql = String::from("CASE\n");
        for segment in Self::ALL {
            match segment.floor() {
                Some(floor) => sql.push_str(&format!(
                    "        WHEN {} > {} THEN '{}'\n",
                    revenue_expr,
                    floor,
                    segment.label()
                )),
                None => sql.push_str(&format!("        ELSE '{}'\n", segment.label())),
            }
        }
        sql.push_str("      END");
        sql
    }
}
