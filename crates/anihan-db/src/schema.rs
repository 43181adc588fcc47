//! Table definitions applied when a database is opened.

/// Tables in dependency order: parents before children.
pub const TABLES: &[&str] = &[
    "users",
    "products",
    "waste_categories",
    "waste_types",
    "waste_submissions",
    "source_waste_submissions",
    "inventory_items",
    "orders",
    "deliveries",
];

/// Idempotent DDL, one statement per entry.
pub const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        full_name TEXT NOT NULL,
        role TEXT NOT NULL CHECK(role IN ('vendor', 'admin', 'user')),
        phone TEXT DEFAULT '',
        address TEXT DEFAULT '',
        profile_photo TEXT DEFAULT '',
        is_active INTEGER DEFAULT 1,
        vendor_status TEXT CHECK(vendor_status IN ('pending', 'approved', 'rejected')),
        business_name TEXT DEFAULT '',
        business_type TEXT DEFAULT '',
        business_license TEXT DEFAULT '',
        years_in_business TEXT DEFAULT '',
        approval_notes TEXT DEFAULT '',
        approved_by TEXT DEFAULT '',
        approved_at TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        price REAL NOT NULL CHECK(price >= 0),
        category TEXT NOT NULL CHECK(category IN ('compost', 'fertilizer', 'preserved_food', 'processed_food', 'other')),
        image_url TEXT DEFAULT '',
        stock_quantity INTEGER NOT NULL DEFAULT 0 CHECK(stock_quantity >= 0),
        unit TEXT NOT NULL CHECK(unit IN ('kg', 'bags', 'bottles', 'pieces', 'jars', 'boxes')),
        is_available INTEGER DEFAULT 1,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS waste_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        color TEXT NOT NULL,
        icon TEXT NOT NULL,
        is_active INTEGER DEFAULT 1,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS waste_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        image_url TEXT NOT NULL,
        category TEXT NOT NULL CHECK(category IN ('fruit', 'vegetable', 'grain', 'other')),
        damage_level TEXT NOT NULL CHECK(damage_level IN ('slight', 'moderate', 'severe')),
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS waste_submissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        waste_type_id INTEGER NOT NULL,
        quantity REAL NOT NULL CHECK(quantity >= 1),
        unit TEXT NOT NULL CHECK(unit IN ('kg', 'pieces', 'baskets', 'bags', 'boxes', 'liters')),
        description TEXT DEFAULT '',
        status TEXT DEFAULT 'pending' CHECK(status IN ('pending', 'approved', 'rejected', 'processed')),
        submitted_at TEXT DEFAULT CURRENT_TIMESTAMP,
        processed_at TEXT,
        title TEXT DEFAULT '',
        category TEXT DEFAULT '',
        condition TEXT DEFAULT '',
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (waste_type_id) REFERENCES waste_types(id) ON DELETE CASCADE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS source_waste_submissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vendor_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        quantity REAL NOT NULL CHECK(quantity >= 1),
        unit TEXT NOT NULL CHECK(unit IN ('kg', 'pieces', 'baskets', 'bags', 'boxes', 'liters')),
        condition TEXT NOT NULL CHECK(condition IN ('fresh', 'slightly_damaged', 'overripe', 'bruised', 'expired', 'other')),
        location TEXT NOT NULL,
        pickup_date TEXT NOT NULL,
        estimated_value REAL DEFAULT 0,
        image_url TEXT DEFAULT '',
        status TEXT DEFAULT 'pending' CHECK(status IN ('pending', 'approved', 'rejected', 'collected', 'processed')),
        admin_notes TEXT DEFAULT '',
        rejection_reason TEXT DEFAULT '',
        actual_value REAL,
        submitted_at TEXT DEFAULT CURRENT_TIMESTAMP,
        processed_at TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (vendor_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (category_id) REFERENCES waste_categories(id) ON DELETE CASCADE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS inventory_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vendor_id INTEGER NOT NULL,
        product_name TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT NOT NULL CHECK(category IN ('compost', 'fertilizer', 'preserved_food', 'processed_food', 'other')),
        quantity REAL NOT NULL DEFAULT 0 CHECK(quantity >= 0),
        unit TEXT NOT NULL CHECK(unit IN ('kg', 'bags', 'bottles', 'pieces', 'jars', 'boxes')),
        price_per_unit REAL NOT NULL CHECK(price_per_unit >= 0),
        total_value REAL NOT NULL CHECK(total_value >= 0),
        source_waste_submission_id INTEGER,
        image_url TEXT DEFAULT '',
        is_available INTEGER DEFAULT 1,
        quantity_history TEXT DEFAULT '[]',
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (vendor_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (source_waste_submission_id) REFERENCES source_waste_submissions(id) ON DELETE SET NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        product_id INTEGER NOT NULL,
        quantity INTEGER NOT NULL CHECK(quantity >= 1),
        total_price REAL NOT NULL CHECK(total_price >= 0),
        status TEXT DEFAULT 'pending' CHECK(status IN ('pending', 'confirmed', 'processing', 'shipped', 'delivered', 'cancelled')),
        payment_status TEXT DEFAULT 'pending' CHECK(payment_status IN ('pending', 'paid', 'failed', 'refunded')),
        payment_method TEXT NOT NULL CHECK(payment_method IN ('cash', 'gcash')),
        payment_reference TEXT DEFAULT '',
        delivery_status TEXT DEFAULT 'pending' CHECK(delivery_status IN ('pending', 'assigned', 'picked_up', 'in_transit', 'delivered', 'failed')),
        delivery_address TEXT NOT NULL,
        delivery_notes TEXT DEFAULT '',
        order_date TEXT DEFAULT CURRENT_TIMESTAMP,
        delivery_date TEXT,
        notes TEXT DEFAULT '',
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS deliveries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL,
        delivery_person TEXT DEFAULT '',
        delivery_vehicle TEXT DEFAULT '',
        pickup_time TEXT,
        delivery_time TEXT,
        status TEXT DEFAULT 'pending' CHECK(status IN ('pending', 'assigned', 'picked_up', 'in_transit', 'delivered', 'failed')),
        notes TEXT DEFAULT '',
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE CASCADE
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
    "CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_product_id ON orders(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_waste_submissions_user_id ON waste_submissions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_source_waste_submissions_vendor_id ON source_waste_submissions(vendor_id)",
    "CREATE INDEX IF NOT EXISTS idx_inventory_items_vendor_id ON inventory_items(vendor_id)",
    "CREATE INDEX IF NOT EXISTS idx_deliveries_order_id ON deliveries(order_id)",
];
