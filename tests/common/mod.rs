use orderdash::Store;

pub const SCHEMA: &str = "
    CREATE TABLE Orders (
        order_id INTEGER PRIMARY KEY,
        customer_id INTEGER,
        order_date TEXT,
        total_amount REAL
    );
    CREATE TABLE Products (
        product_id INTEGER PRIMARY KEY,
        product_name TEXT,
        category TEXT,
        price REAL
    );
    CREATE TABLE Order_Items (
        order_item_id INTEGER PRIMARY KEY,
        order_id INTEGER NOT NULL REFERENCES Orders(order_id),
        product_id INTEGER NOT NULL REFERENCES Products(product_id),
        quantity INTEGER NOT NULL DEFAULT 1
    );
";

/// Four products across two categories, five orders over three months
pub const SEED: &str = "
    INSERT INTO Products (product_id, product_name, category, price) VALUES
        (1, 'Contract Template', 'Business', 25.0),
        (2, 'NDA Form', 'Business', 10.0),
        (3, 'Will Kit', 'Estate', 40.0),
        (4, 'Lease Agreement', 'Property', 15.0);

    INSERT INTO Orders (order_id, customer_id, order_date, total_amount) VALUES
        (1, 100, '2024-01-01', 35.0),
        (2, 101, '2024-01-01 16:20:00', 25.0),
        (3, 100, '2024-01-09', 65.0),
        (4, 102, '2024-02-14', 25.0),
        (5, 103, '2024-03-30', 40.0);

    INSERT INTO Order_Items (order_id, product_id) VALUES
        (1, 1), (1, 2),
        (2, 1),
        (3, 1), (3, 3),
        (4, 1),
        (5, 3);
";

/// In-memory store with the schema and no rows
pub fn empty_store() -> Store {
    let store = Store::memory().expect("in-memory store");
    store.connection().execute_batch(SCHEMA).expect("schema");
    store
}

/// In-memory store with the schema and the seed rows
pub fn seeded_store() -> Store {
    let store = empty_store();
    store.connection().execute_batch(SEED).expect("seed");
    store
}
