//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/spenders/{spender_id}/transactions', use [format_endpoint].

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/v1/transactions";
/// The route to update a single transaction.
pub const TRANSACTION: &str = "/api/v1/transactions/{transaction_id}";
/// The route to list the transactions of a spender.
pub const SPENDER_TRANSACTIONS: &str = "/api/v1/spenders/{spender_id}/transactions";
/// The route to get the income, expense and balance totals of a spender.
pub const SPENDER_SUMMARY: &str = "/api/v1/spenders/{spender_id}/transactions/summary";
/// The route to check that the server and its storage are up.
pub const HEALTH: &str = "/api/v1/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/spenders/{spender_id}', '{spender_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
