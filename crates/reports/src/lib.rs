//! The report definition table.
//!
//! Every endpoint the service exposes is one entry here: a route, a fixed
//! SQL statement and the shape the caller expects back. The table is closed,
//! none of the statements take parameters.

use once_cell::sync::Lazy;

pub mod aging;
pub mod segment;

pub use aging::AgingBucket;
pub use segment::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// First row as a flat object.
    SingleRow,
    /// Every row, as an array of objects.
    RowList,
}

#[derive(Debug, Clone)]
pub struct ReportDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub route: &'static str,
    pub sql: String,
    pub shape: ResultShape,
}

impl ReportDefinition {
    fn new(
        name: &'static str,
        label: &'static str,
        route: &'static str,
        sql: impl Into<String>,
        shape: ResultShape,
    ) -> Self {
        Self {
            name,
            label,
            route,
            sql: sql.into(),
            shape,
        }
    }
}

const FINANCIAL_SUMMARY_SQL: &str = "
    SELECT
      SUM(inv_tot) as total_revenue,
      COUNT(*) as total_invoices,
      AVG(inv_tot) as avg_invoice_value
    FROM tbl_invoice
    WHERE inv_cancelled_status = 0
";

const REVENUE_BY_MONTH_SQL: &str = "
    SELECT
      DATE_FORMAT(inv_date, '%Y-%m') as month,
      SUM(inv_tot) as revenue,
      COUNT(*) as invoice_count
    FROM tbl_invoice
    WHERE inv_cancelled_status = 0
    GROUP BY DATE_FORMAT(inv_date, '%Y-%m')
    ORDER BY month DESC
    LIMIT 12
";

const BOOKINGS_SQL: &str = "
    SELECT
      b_status,
      COUNT(*) as count,
      SUM(bk_chgs_tot_selling) as total_value
    FROM tbl_booking
    GROUP BY b_status
";

const TOP_ROUTES_SQL: &str = "
    SELECT
      CONCAT(b_v_load_port, ' → ', b_v_dis_port) as route,
      COUNT(*) as volume,
      SUM(bk_chgs_tot_selling) as value
    FROM tbl_booking
    WHERE b_v_load_port IS NOT NULL AND b_v_dis_port IS NOT NULL
    GROUP BY route
    ORDER BY volume DESC
    LIMIT 10
";

const TOP_CUSTOMERS_SQL: &str = "
    SELECT
      client_id,
      inv_name as client_name,
      COUNT(*) as booking_count,
      SUM(inv_tot) as total_revenue
    FROM tbl_invoice
    WHERE inv_cancelled_status = 0
    GROUP BY client_id, inv_name
    ORDER BY total_revenue DESC
    LIMIT 10
";

const RECENT_ACTIVITIES_SQL: &str = "
    SELECT
      activity_module,
      activity_action,
      activity_desc,
      activity_datetime,
      user_id
    FROM tbl_activity_log
    ORDER BY activity_datetime DESC
    LIMIT 20
";

fn outstanding_sql() -> String {
    format!(
        "
    SELECT
      {} as aging_category,
      SUM(inv_tot) as amount,
      COUNT(*) as count
    FROM tbl_invoice
    WHERE acc_post = 0 AND inv_cancelled_status = 0
    GROUP BY aging_category
    ORDER BY
      {}
",
        AgingBucket::case_sql("DATEDIFF(NOW(), inv_date)"),
        AgingBucket::rank_sql("aging_category"),
    )
}

fn segmentation_sql() -> String {
    format!(
        "
    SELECT
      {} as segment,
      COUNT(*) as customer_count,
      SUM(total_revenue) as segment_revenue
    FROM (
      SELECT
        client_id,
        SUM(inv_tot) as total_revenue
      FROM tbl_invoice
      WHERE inv_cancelled_status = 0
      GROUP BY client_id
    ) as customer_totals
    GROUP BY segment
    ORDER BY segment_revenue DESC
",
        Segment::case_sql("total_revenue"),
    )
}

static REPORTS: Lazy<Vec<ReportDefinition>> = Lazy::new(|| {
    use ResultShape::*;
    vec![
        ReportDefinition::new(
            "financial_summary",
            "Financial summary",
            "/api/financial/summary",
            FINANCIAL_SUMMARY_SQL,
            SingleRow,
        ),
        ReportDefinition::new(
            "revenue_by_month",
            "Revenue by month",
            "/api/financial/revenue-by-month",
            REVENUE_BY_MONTH_SQL,
            RowList,
        ),
        ReportDefinition::new(
            "outstanding",
            "Outstanding invoices by aging",
            "/api/financial/outstanding",
            outstanding_sql(),
            RowList,
        ),
        ReportDefinition::new(
            "bookings",
            "Booking statistics",
            "/api/operational/bookings",
            BOOKINGS_SQL,
            RowList,
        ),
        ReportDefinition::new(
            "top_routes",
            "Top routes",
            "/api/operational/top-routes",
            TOP_ROUTES_SQL,
            RowList,
        ),
        ReportDefinition::new(
            "top_customers",
            "Top customers",
            "/api/customers/top",
            TOP_CUSTOMERS_SQL,
            RowList,
        ),
        ReportDefinition::new(
            "segmentation",
            "Customer segmentation",
            "/api/customers/segmentation",
            segmentation_sql(),
            RowList,
        ),
        ReportDefinition::new(
            "recent_activities",
            "Recent activities",
            "/api/activities/recent",
            RECENT_ACTIVITIES_SQL,
            RowList,
        ),
    ]
});

/// All reports in registration order.
pub fn reports() -> &'static [ReportDefinition] {
    &REPORTS
}

pub fn find_by_route(route: &str) -> Option<&'static ReportDefinition> {
    reports().iter().find(|r| r.route == route)
}

pub fn find_by_name(name: &str) -> Option<&'static ReportDefinition> {
    reports().iter().find(|r| r.name == name)
}
