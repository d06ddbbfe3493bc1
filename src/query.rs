//! Read-only aggregation queries against the order store

use rusqlite::Row;
use tracing::debug;

use crate::error::Result;
use crate::store::Store;

/// Orders per calendar date.
///
/// The key is the calendar date as written in the store, so a zoned
/// timestamp stays on its local date instead of being shifted to UTC by
/// `DATE()`. Values SQLite cannot read as a date are passed through
/// untouched so that bucketing reports them as parse errors. NULL dates
/// form their own group.
pub const DAILY_ORDERS_SQL: &str = "
    SELECT
        CASE
            WHEN DATE(order_date) IS NOT NULL AND DATE(substr(order_date, 1, 10)) IS NOT NULL
                THEN substr(order_date, 1, 10)
            ELSE order_date
        END AS order_day,
        COUNT(order_id) AS number_of_orders,
        COALESCE(SUM(total_amount), 0.0) AS total_amount
    FROM Orders
    GROUP BY order_day
    ORDER BY order_day
";

pub const ORDER_LINES_SQL: &str = "
    SELECT
        Products.product_name,
        Products.category,
        Products.price,
        Orders.order_id,
        Orders.order_date
    FROM Orders
    JOIN Order_Items ON Orders.order_id = Order_Items.order_id
    JOIN Products ON Products.product_id = Order_Items.product_id
    ORDER BY Orders.order_id, Products.product_id
";

/// Equal frequencies are ordered by product name, then category. Products
/// without a name or category have no group and are left out.
pub const PRODUCT_FREQUENCY_SQL: &str = "
    SELECT
        Products.product_name,
        Products.category,
        COUNT(Orders.order_id) AS frequency
    FROM Orders
    JOIN Order_Items ON Orders.order_id = Order_Items.order_id
    JOIN Products ON Products.product_id = Order_Items.product_id
    WHERE Products.product_name IS NOT NULL AND Products.category IS NOT NULL
    GROUP BY Products.product_name, Products.category
    ORDER BY frequency DESC, Products.product_name ASC, Products.category ASC
";

/// Order volume for one calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct DailyOrderSummary {
    /// `YYYY-MM-DD` as written in the store; `None` groups orders without a date
    pub date: Option<String>,
    pub order_count: i64,
    pub total_amount: f64,
}

/// One order line joined to its product.
///
/// Product and order columns are nullable in the store; a NULL cell stays
/// `None` here rather than failing the query.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderProductLine {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub order_id: i64,
    pub order_date: Option<String>,
}

/// How many order lines reference a product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFrequency {
    pub product_name: String,
    pub category: String,
    pub frequency: i64,
}

impl DailyOrderSummary {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            order_count: row.get(1)?,
            total_amount: row.get(2)?,
        })
    }
}

impl OrderProductLine {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            product_name: row.get(0)?,
            category: row.get(1)?,
            price: row.get(2)?,
            order_id: row.get(3)?,
            order_date: row.get(4)?,
        })
    }
}

impl ProductFrequency {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            product_name: row.get(0)?,
            category: row.get(1)?,
            frequency: row.get(2)?,
        })
    }
}

fn fetch<T>(
    store: &Store,
    sql: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = store.connection().prepare(sql)?;
    let rows = stmt.query_map([], map)?.collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(rows)
}

/// Order count and revenue per calendar date; dates without orders are absent
pub fn fetch_daily_orders(store: &Store) -> Result<Vec<DailyOrderSummary>> {
    let rows = fetch(store, DAILY_ORDERS_SQL, DailyOrderSummary::from_row)?;
    debug!(rows = rows.len(), "fetched daily order summary");
    Ok(rows)
}

/// Every historical order line with its product's name, category and price
pub fn fetch_order_lines(store: &Store) -> Result<Vec<OrderProductLine>> {
    let rows = fetch(store, ORDER_LINES_SQL, OrderProductLine::from_row)?;
    debug!(rows = rows.len(), "fetched order lines");
    Ok(rows)
}

/// Purchase frequency per (product, category), most frequent first
pub fn fetch_product_frequency(store: &Store) -> Result<Vec<ProductFrequency>> {
    let rows = fetch(store, PRODUCT_FREQUENCY_SQL, ProductFrequency::from_row)?;
    debug!(rows = rows.len(), "fetched product frequency");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashError;

    fn store_with(sql: &str) -> Store {
        let store = Store::memory().unwrap();
        store
            .connection()
            .execute_batch(
                "CREATE TABLE Orders (order_id INTEGER PRIMARY KEY, order_date TEXT, total_amount REAL);
                 CREATE TABLE Products (product_id INTEGER PRIMARY KEY, product_name TEXT, category TEXT, price REAL);
                 CREATE TABLE Order_Items (order_item_id INTEGER PRIMARY KEY, order_id INTEGER, product_id INTEGER);",
            )
            .unwrap();
        store.connection().execute_batch(sql).unwrap();
        store
    }

    #[test]
    fn test_daily_orders_example() {
        let store = store_with(
            "INSERT INTO Orders VALUES (1, '2024-01-01', 10.0), (2, '2024-01-01', 5.0), (3, '2024-01-02', 20.0);",
        );
        let daily = fetch_daily_orders(&store).unwrap();
        assert_eq!(
            daily,
            vec![
                DailyOrderSummary { date: Some("2024-01-01".into()), order_count: 2, total_amount: 15.0 },
                DailyOrderSummary { date: Some("2024-01-02".into()), order_count: 1, total_amount: 20.0 },
            ]
        );
    }

    #[test]
    fn test_daily_orders_groups_timestamps_by_date() {
        let store = store_with(
            "INSERT INTO Orders VALUES (1, '2024-03-05 09:15:00', 1.5), (2, '2024-03-05 23:59:59', 2.5);",
        );
        let daily = fetch_daily_orders(&store).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date.as_deref(), Some("2024-03-05"));
        assert_eq!(daily[0].order_count, 2);
        assert_eq!(daily[0].total_amount, 4.0);
    }

    #[test]
    fn test_daily_orders_keeps_malformed_dates_visible() {
        let store = store_with("INSERT INTO Orders VALUES (1, 'yesterday', 3.0);");
        let daily = fetch_daily_orders(&store).unwrap();
        assert_eq!(daily[0].date.as_deref(), Some("yesterday"));
    }

    #[test]
    fn test_daily_orders_keep_local_date_of_zoned_timestamps() {
        let store = store_with(
            "INSERT INTO Orders VALUES (1, '2024-01-31T23:30:00-02:00', 8.0), (2, '2024-01-31', 2.0);",
        );
        let daily = fetch_daily_orders(&store).unwrap();
        assert_eq!(
            daily,
            vec![DailyOrderSummary { date: Some("2024-01-31".into()), order_count: 2, total_amount: 10.0 }]
        );
    }

    #[test]
    fn test_daily_orders_null_date_is_its_own_group() {
        let store = store_with("INSERT INTO Orders VALUES (1, NULL, 3.0), (2, '2024-01-02', 4.0);");
        let daily = fetch_daily_orders(&store).unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, None);
        assert_eq!(daily[0].order_count, 1);
        assert_eq!(daily[1].date.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn test_null_product_cells_do_not_fail_queries() {
        let store = store_with(
            "INSERT INTO Orders VALUES (1, '2024-01-01', 10.0);
             INSERT INTO Products VALUES (1, 'NDA Form', NULL, 10.0), (2, 'Will Kit', 'Estate', NULL);
             INSERT INTO Order_Items (order_id, product_id) VALUES (1, 1), (1, 2);",
        );
        let lines = fetch_order_lines(&store).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].category, None);
        assert_eq!(lines[1].price, None);

        let freq = fetch_product_frequency(&store).unwrap();
        assert_eq!(
            freq,
            vec![ProductFrequency { product_name: "Will Kit".into(), category: "Estate".into(), frequency: 1 }]
        );
    }

    #[test]
    fn test_order_lines_empty_is_not_an_error() {
        let store = store_with("INSERT INTO Orders VALUES (1, '2024-01-01', 10.0);");
        assert!(fetch_order_lines(&store).unwrap().is_empty());
    }

    #[test]
    fn test_frequency_tie_break_is_product_name() {
        let store = store_with(
            "INSERT INTO Orders VALUES (1, '2024-01-01', 10.0);
             INSERT INTO Products VALUES (1, 'Will Kit', 'Estate', 5.0), (2, 'Lease', 'Property', 5.0);
             INSERT INTO Order_Items (order_id, product_id) VALUES (1, 1), (1, 2);",
        );
        let freq = fetch_product_frequency(&store).unwrap();
        let names: Vec<_> = freq.iter().map(|f| f.product_name.as_str()).collect();
        assert_eq!(names, vec!["Lease", "Will Kit"]);
    }

    #[test]
    fn test_missing_table_is_data_access_error() {
        let store = Store::memory().unwrap();
        let err = fetch_product_frequency(&store).unwrap_err();
        assert!(matches!(err, DashError::DataAccess(_)));
    }
}
