//! Parsing of `svcat get instances` output
//!
//! The listing is plain text: a banner line, a column header line, then one
//! whitespace-separated record per instance:
//!
//! ```text
//!   NAME      NAMESPACE   CLASS          PLAN    STATUS
//! +--------+-----------+--------------+-------+--------+
//!   mydb      default     azure-mysql    basic   Ready
//! ```

use super::ServiceInstance;
use tracing::warn;

/// Number of leading lines (banner + header) before the records
const PREAMBLE_LINES: usize = 2;

/// Parse instance records from listing text.
///
/// Blank lines are skipped. Rows are not validated: missing trailing columns
/// become empty strings and extra columns are ignored.
pub fn parse_instance_table(text: &str) -> Vec<ServiceInstance> {
    text.lines()
        .skip(PREAMBLE_LINES)
        .filter_map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Option<ServiceInstance> {
    let mut columns = line.split_whitespace();
    let name = columns.next()?.to_string();
    let mut next = || columns.next().unwrap_or_default().to_string();

    let instance = ServiceInstance {
        name,
        namespace: next(),
        class: next(),
        plan: next(),
        status: next(),
    };

    if instance.status.is_empty() {
        warn!(row = %line.trim(), "short row in instance listing");
    }
    Some(instance)
}
