//! Column descriptors, sort/filter/page query and CSV export for the customer grid.

use std::{cmp::Ordering, collections::BTreeMap, io::Write};

use shared::domain::{Customer, CustomerField};

use crate::error::ClientError;

pub const PAGE_SIZE: usize = 10;
pub const DEFAULT_EXPORT_FILE_NAME: &str = "export.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridAction {
    Export,
    AttachTraining,
    Edit,
    Delete,
}

impl GridAction {
    pub fn label(self) -> &'static str {
        match self {
            GridAction::Export => "Download CSV File",
            GridAction::AttachTraining => "Add training",
            GridAction::Edit => "Edit",
            GridAction::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Data(CustomerField),
    Action(GridAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub kind: ColumnKind,
    pub header: &'static str,
    pub sortable: bool,
    pub filterable: bool,
    pub width: Option<f32>,
}

impl ColumnDescriptor {
    pub fn data(field: CustomerField) -> Self {
        Self {
            kind: ColumnKind::Data(field),
            header: field.label(),
            sortable: true,
            filterable: true,
            width: None,
        }
    }

    pub fn action(action: GridAction, width: f32) -> Self {
        Self {
            kind: ColumnKind::Action(action),
            header: "",
            sortable: false,
            filterable: false,
            width: Some(width),
        }
    }

    pub fn field(&self) -> Option<CustomerField> {
        match self.kind {
            ColumnKind::Data(field) => Some(field),
            ColumnKind::Action(_) => None,
        }
    }
}

/// Seven data columns followed by the per-row action columns.
pub fn customer_columns() -> Vec<ColumnDescriptor> {
    let mut columns: Vec<_> = CustomerField::ALL
        .into_iter()
        .map(ColumnDescriptor::data)
        .collect();
    columns.push(ColumnDescriptor::action(GridAction::AttachTraining, 90.0));
    columns.push(ColumnDescriptor::action(GridAction::Edit, 120.0));
    columns.push(ColumnDescriptor::action(GridAction::Delete, 120.0));
    columns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridQuery {
    sort: Option<(CustomerField, SortDirection)>,
    filters: BTreeMap<CustomerField, String>,
    page: usize,
    page_size: usize,
}

impl Default for GridQuery {
    fn default() -> Self {
        Self {
            sort: None,
            filters: BTreeMap::new(),
            page: 0,
            page_size: PAGE_SIZE,
        }
    }
}

impl GridQuery {
    pub fn sort(&self) -> Option<(CustomerField, SortDirection)> {
        self.sort
    }

    pub fn sort_by(&mut self, field: CustomerField, direction: SortDirection) {
        self.sort = Some((field, direction));
    }

    /// Header click: ascending, then descending, then unsorted.
    pub fn toggle_sort(&mut self, field: CustomerField) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == field => {
                Some((field, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == field => None,
            _ => Some((field, SortDirection::Ascending)),
        };
    }

    pub fn filter(&self, field: CustomerField) -> &str {
        self.filters.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Blank text clears the filter. Changing filters returns to the first page.
    pub fn set_filter(&mut self, field: CustomerField, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            self.filters.remove(&field);
        } else {
            self.filters.insert(field, text);
        }
        self.page = 0;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, page: usize, total_rows: usize) {
        self.page = page.min(self.page_count(total_rows) - 1);
    }

    fn matches(&self, customer: &Customer) -> bool {
        self.filters.iter().all(|(field, needle)| {
            customer
                .field(*field)
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        })
    }

    /// Rows after filtering and sorting, across all pages.
    pub fn displayed<'a>(&self, rows: &'a [Customer]) -> Vec<&'a Customer> {
        let mut displayed: Vec<&Customer> = rows.iter().filter(|c| self.matches(c)).collect();
        if let Some((field, direction)) = self.sort {
            displayed.sort_by(|a, b| {
                let ordering = compare_text(a.field(field), b.field(field));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        displayed
    }

    /// Rows on the current page. A page past the end clamps to the last page.
    pub fn page_rows<'a>(&self, rows: &'a [Customer]) -> Vec<&'a Customer> {
        let displayed = self.displayed(rows);
        let page = self.page.min(self.page_count(displayed.len()) - 1);
        displayed
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect()
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Control handle handed over when the grid signals readiness.
#[derive(Debug, Clone, PartialEq)]
pub struct GridHandle {
    columns: Vec<ColumnDescriptor>,
}

impl Default for GridHandle {
    fn default() -> Self {
        Self::new(customer_columns())
    }
}

impl GridHandle {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Writes the displayed rows (all pages) for every data column.
    /// Action columns carry no data and are skipped.
    pub fn export_csv<W: Write>(
        &self,
        rows: &[Customer],
        query: &GridQuery,
        out: W,
    ) -> Result<usize, ClientError> {
        let fields: Vec<CustomerField> = self
            .columns
            .iter()
            .filter_map(ColumnDescriptor::field)
            .collect();
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(out);
        writer.write_record(fields.iter().map(|field| field.label()))?;

        let displayed = query.displayed(rows);
        for customer in &displayed {
            writer.write_record(fields.iter().map(|field| customer.field(*field)))?;
        }
        writer.flush()?;
        Ok(displayed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(firstname: &str, city: &str) -> Customer {
        Customer {
            firstname: firstname.into(),
            city: city.into(),
            ..Customer::default()
        }
    }

    fn rows() -> Vec<Customer> {
        vec![
            customer("bob", "Turku"),
            customer("Ada", "London"),
            customer("Cleo", "Helsinki"),
        ]
    }

    fn firstnames(rows: &[&Customer]) -> Vec<String> {
        rows.iter().map(|c| c.firstname.clone()).collect()
    }

    #[test]
    fn column_layout_has_seven_data_and_three_action_columns() {
        let columns = customer_columns();
        assert_eq!(columns.len(), 10);
        assert!(columns[..7].iter().all(|c| c.sortable && c.filterable));
        let actions: Vec<_> = columns[7..].iter().map(|c| (c.kind, c.width)).collect();
        assert_eq!(
            actions,
            vec![
                (ColumnKind::Action(GridAction::AttachTraining), Some(90.0)),
                (ColumnKind::Action(GridAction::Edit), Some(120.0)),
                (ColumnKind::Action(GridAction::Delete), Some(120.0)),
            ]
        );
        assert!(columns[7..].iter().all(|c| !c.sortable && !c.filterable && c.header.is_empty()));
    }

    #[test]
    fn toggle_sort_cycles_ascending_descending_none() {
        let rows = rows();
        let mut query = GridQuery::default();

        query.toggle_sort(CustomerField::Firstname);
        assert_eq!(firstnames(&query.displayed(&rows)), ["Ada", "bob", "Cleo"]);

        query.toggle_sort(CustomerField::Firstname);
        assert_eq!(firstnames(&query.displayed(&rows)), ["Cleo", "bob", "Ada"]);

        query.toggle_sort(CustomerField::Firstname);
        assert_eq!(query.sort(), None);
        assert_eq!(firstnames(&query.displayed(&rows)), ["bob", "Ada", "Cleo"]);
    }

    #[test]
    fn sorting_another_column_starts_ascending() {
        let mut query = GridQuery::default();
        query.sort_by(CustomerField::Firstname, SortDirection::Descending);
        query.toggle_sort(CustomerField::City);
        assert_eq!(
            query.sort(),
            Some((CustomerField::City, SortDirection::Ascending))
        );
    }

    #[test]
    fn filter_is_case_insensitive_contains_and_blank_clears() {
        let rows = rows();
        let mut query = GridQuery::default();
        query.set_filter(CustomerField::City, "LON");
        assert_eq!(firstnames(&query.displayed(&rows)), ["Ada"]);

        query.set_filter(CustomerField::City, "  ");
        assert_eq!(query.filter(CustomerField::City), "");
        assert_eq!(query.displayed(&rows).len(), 3);
    }

    #[test]
    fn pages_hold_ten_rows_and_clamp() {
        let rows: Vec<_> = (0..23).map(|i| customer(&format!("c{i:02}"), "x")).collect();
        let mut query = GridQuery::default();
        assert_eq!(query.page_count(rows.len()), 3);
        assert_eq!(query.page_rows(&rows).len(), 10);

        query.set_page(7, rows.len());
        assert_eq!(query.page(), 2);
        assert_eq!(firstnames(&query.page_rows(&rows)), ["c20", "c21", "c22"]);

        query.set_filter(CustomerField::Firstname, "c1");
        assert_eq!(query.page(), 0);
        assert_eq!(query.page_count(0), 1);
    }

    #[test]
    fn export_writes_quoted_header_and_displayed_rows() {
        let rows = rows();
        let mut query = GridQuery::default();
        query.toggle_sort(CustomerField::Firstname);

        let mut out = Vec::new();
        let written = GridHandle::default()
            .export_csv(&rows, &query, &mut out)
            .expect("export");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(written, 3);
        assert_eq!(
            lines[0],
            r#""Firstname","Lastname","Streetaddress","Postcode","City","Email","Phone""#
        );
        assert_eq!(lines[1], r#""Ada","","","","London","","""#);
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn export_ignores_pagination() {
        let rows: Vec<_> = (0..15).map(|i| customer(&format!("c{i}"), "x")).collect();
        let mut query = GridQuery::default();
        query.set_page(1, rows.len());
        let written = GridHandle::default()
            .export_csv(&rows, &query, std::io::sink())
            .expect("export");
        assert_eq!(written, 15);
    }
}
