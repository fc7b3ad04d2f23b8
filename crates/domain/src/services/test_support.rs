//! Fixtures shared by the use-case tests.

use chrono::Utc;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use crate::models::{Local, LocalInput, Product, ProductInput, Role, StatusCode, User};

pub fn user_with_role(role: Role) -> User {
    let now = Utc::now();
    User {
        id: (1i64..10_000).fake(),
        name: Name().fake(),
        email: SafeEmail().fake(),
        document: None,
        is_foreigner: false,
        image_url: None,
        role,
        created_at: now,
        modified_at: now,
    }
}

pub fn product_input() -> ProductInput {
    ProductInput {
        name: "Front Gate".into(),
        description: "Main entrance".into(),
        local_id: 3,
        is_active: true,
        ip_address: "192.168.0.10".into(),
        port: 554,
        username: "admin".into(),
        password: "admin".into(),
        stream_path: "/live".into(),
        camera_type: "Intelbras".into(),
        stream_url: None,
        image_base64: None,
    }
}

pub fn sample_product(owner_id: i64, id: i64) -> Product {
    let now = Utc::now();
    Product {
        id,
        user_id: owner_id,
        local_id: 3,
        name: "Front Gate".into(),
        description: String::new(),
        is_active: true,
        status_code: StatusCode::Exists,
        parameter: false,
        ip_address: "192.168.0.10".into(),
        port: 554,
        username: "admin".into(),
        password: "admin".into(),
        stream_path: "/live".into(),
        camera_type: "Intelbras".into(),
        stream_url: None,
        image_url: None,
        created_at: now,
        modified_at: now,
    }
}

pub fn local_input() -> LocalInput {
    LocalInput {
        name: "Warehouse".into(),
        description: String::new(),
        state: "PE".into(),
        city: "Recife".into(),
        street: "Rua da Aurora, 100".into(),
        is_active: true,
    }
}

pub fn sample_local(owner_id: i64, id: i64) -> Local {
    let now = Utc::now();
    Local {
        id,
        user_id: owner_id,
        name: "Warehouse".into(),
        description: String::new(),
        state: "PE".into(),
        city: "Recife".into(),
        street: "Rua da Aurora, 100".into(),
        is_active: true,
        status_code: StatusCode::Exists,
        created_at: now,
        modified_at: now,
    }
}
