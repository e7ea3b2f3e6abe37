//! Table output for the service catalog

use crate::catalog::ServiceInstance;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

const COLUMNS: [&str; 5] = ["NAME", "NAMESPACE", "CLASS", "PLAN", "STATUS"];

/// Format service instances as an ASCII table
pub fn format_instances(instances: &[ServiceInstance]) -> String {
    if instances.is_empty() {
        return "(no service instances)".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header: Vec<Cell> = COLUMNS
        .iter()
        .map(|col| Cell::new(col).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(header);

    for instance in instances {
        table.add_row(vec![
            Cell::new(&instance.name),
            Cell::new(&instance.namespace),
            Cell::new(&instance.class),
            Cell::new(&instance.plan),
            Cell::new(&instance.status),
        ]);
    }

    table.to_string()
}
