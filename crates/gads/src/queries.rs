//! GAQL query construction.
//!
//! Queries are assembled as plain strings the way the API expects them.
//! Date values are validated upstream (strict `YYYY-MM-DD`) and id values
//! are reduced to their digits before interpolation, so no foreign syntax
//! can reach the query text.

/// Hard ceiling on rows returned by any single report query. Callers that
/// need more must narrow the date range or filters.
pub const MAX_REPORT_ROWS: usize = 10_000;

/// Strips everything but digits from an external id
/// (`"123-456-7890"` → `"1234567890"`).
pub fn normalize_customer_id(id: &str) -> String {
    id.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Metadata lookup for a single customer.
pub fn customer_metadata(customer_id: &str) -> String {
    format!(
        "SELECT customer.id, customer.descriptive_name, customer.currency_code, \
         customer.time_zone, customer.manager, customer.test_account \
         FROM customer WHERE customer.id = {} LIMIT 1",
        normalize_customer_id(customer_id)
    )
}

/// Full client roster of a manager account, including suspended, closed and
/// canceled accounts but excluding hidden ones.
pub fn managed_clients() -> String {
    "SELECT customer_client.id, customer_client.descriptive_name, \
     customer_client.currency_code, customer_client.time_zone, \
     customer_client.manager, customer_client.level, customer_client.status, \
     customer_client.hidden \
     FROM customer_client WHERE customer_client.hidden = FALSE"
        .to_string()
}

/// Search-term report for a date range, highest-traffic terms first.
pub fn search_terms(
    start_date: &str,
    end_date: &str,
    campaign_id: Option<&str>,
    ad_group_id: Option<&str>,
) -> String {
    let mut conditions = vec![
        format!("segments.date BETWEEN '{}' AND '{}'", start_date, end_date),
        "campaign.status = 'ENABLED'".to_string(),
        "ad_group.status = 'ENABLED'".to_string(),
    ];

    if let Some(id) = campaign_id {
        conditions.push(format!("campaign.id = {}", normalize_customer_id(id)));
    }

    if let Some(id) = ad_group_id {
        conditions.push(format!("ad_group.id = {}", normalize_customer_id(id)));
    }

    format!(
        "SELECT campaign.id, campaign.name, ad_group.id, ad_group.name, \
         search_term_view.search_term, ad_group_criterion.keyword.text, \
         ad_group_criterion.keyword.match_type, metrics.impressions, \
         metrics.clicks, metrics.cost_micros, metrics.conversions, \
         metrics.conversions_value \
         FROM search_term_view WHERE {} \
         ORDER BY metrics.impressions DESC LIMIT {}",
        conditions.join(" AND "),
        MAX_REPORT_ROWS
    )
}

/// Campaign report. With a date range the query carries performance metric
/// fields; without one it is a lightweight metadata listing.
pub fn campaigns(date_range: Option<(&str, &str)>) -> String {
    let metrics_fields = if date_range.is_some() {
        ", metrics.impressions, metrics.clicks, metrics.cost_micros, \
         metrics.conversions, metrics.conversions_value, metrics.ctr, \
         metrics.average_cpc, metrics.average_cpm"
    } else {
        ""
    };

    let where_clause = match date_range {
        Some((start, end)) => format!(" WHERE segments.date BETWEEN '{}' AND '{}'", start, end),
        None => String::new(),
    };

    format!(
        "SELECT campaign.id, campaign.name, campaign.status, \
         campaign.bidding_strategy_type, campaign.advertising_channel_type, \
         campaign_budget.amount_micros, customer.currency_code, \
         campaign.start_date, campaign.end_date{} \
         FROM campaign{} ORDER BY campaign.name ASC",
        metrics_fields, where_clause
    )
}

/// Ad-group listing, optionally scoped to one campaign.
pub fn ad_groups(campaign_id: Option<&str>) -> String {
    let mut conditions = vec![
        "ad_group.status IN ('ENABLED', 'PAUSED')".to_string(),
        "campaign.status IN ('ENABLED', 'PAUSED')".to_string(),
    ];

    if let Some(id) = campaign_id {
        conditions.push(format!("campaign.id = {}", normalize_customer_id(id)));
    }

    format!(
        "SELECT campaign.id, campaign.name, ad_group.id, ad_group.name, \
         ad_group.status, ad_group.type, ad_group.cpc_bid_micros, \
         ad_group.target_cpa_micros \
         FROM ad_group WHERE {} \
         ORDER BY campaign.name ASC, ad_group.name ASC LIMIT {}",
        conditions.join(" AND "),
        MAX_REPORT_ROWS
    )
}

/// Keyword criteria of one ad group.
pub fn keywords(ad_group_id: &str, campaign_id: Option<&str>) -> String {
    let mut conditions = vec![
        format!("ad_group.id = {}", normalize_customer_id(ad_group_id)),
        "ad_group_criterion.type = 'KEYWORD'".to_string(),
        "ad_group_criterion.status IN ('ENABLED', 'PAUSED')".to_string(),
    ];

    if let Some(id) = campaign_id {
        conditions.push(format!("campaign.id = {}", normalize_customer_id(id)));
    }

    format!(
        "SELECT campaign.id, campaign.name, ad_group.id, ad_group.name, \
         ad_group_criterion.criterion_id, ad_group_criterion.keyword.text, \
         ad_group_criterion.keyword.match_type, ad_group_criterion.status, \
         ad_group_criterion.final_urls, ad_group_criterion.cpc_bid_micros, \
         ad_group_criterion.quality_info.quality_score \
         FROM ad_group_criterion WHERE {} \
         ORDER BY ad_group_criterion.keyword.text ASC LIMIT {}",
        conditions.join(" AND "),
        MAX_REPORT_ROWS
    )
}
