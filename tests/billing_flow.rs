//! End-to-end flows against an in-memory store:
//! seeding a menu and an order, aggregating the bill, and persisting tokens.
//! Run: cargo test --test billing_flow

use std::time::Duration;

use rust_decimal::Decimal;

use resto_server::auth::{JwtConfig, JwtService, hash_password, verify_password};
use resto_server::billing::BillingAggregator;
use resto_server::db::DbService;
use resto_server::db::models::{
    DiningTableCreate, FoodCreate, MenuCreate, OrderCreate, OrderItemCreate, UserCreate,
};
use resto_server::db::repository::{
    DiningTableRepository, FoodRepository, MenuRepository, OrderItemRepository, OrderRepository,
    RepoError, UserRepository,
};
use resto_server::utils::PageParams;

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

async fn memory_db() -> DbService {
    DbService::memory(Duration::from_secs(10), Duration::from_secs(100))
        .await
        .unwrap()
}

fn test_jwt() -> JwtService {
    JwtService::with_config(JwtConfig {
        secret: "integration-test-secret-key-0123456789".to_string(),
        session_minutes: 15,
        refresh_days: 7,
    })
}

#[tokio::test]
async fn billing_summary_for_a_seeded_order() {
    let db = memory_db().await;

    let menu = MenuRepository::new(db.clone())
        .create(MenuCreate {
            name: "Dinner".to_string(),
            category: "evening".to_string(),
            start_date: None,
            end_date: None,
        })
        .await
        .unwrap();

    let foods = FoodRepository::new(db.clone());
    let margherita = foods
        .create(FoodCreate {
            name: "Margherita".to_string(),
            price: dec("9.50"),
            food_image: None,
            menu_id: menu.menu_id.clone(),
        })
        .await
        .unwrap();
    let carbonara = foods
        .create(FoodCreate {
            name: "Carbonara".to_string(),
            price: dec("12.00"),
            food_image: None,
            menu_id: menu.menu_id.clone(),
        })
        .await
        .unwrap();

    let table = DiningTableRepository::new(db.clone())
        .create(DiningTableCreate {
            table_number: 4,
            number_of_guests: 2,
        })
        .await
        .unwrap();

    let order = OrderRepository::new(db.clone())
        .create(OrderCreate {
            table_id: Some(table.table_id.clone()),
        })
        .await
        .unwrap();

    // three margheritas on one line: the billed amount stays the menu price
    let items = OrderItemRepository::new(db.clone())
        .insert_many(
            &order.order_id,
            vec![
                OrderItemCreate {
                    food_id: margherita.food_id.clone(),
                    quantity: 3,
                    unit_price: dec("9.50"),
                },
                OrderItemCreate {
                    food_id: carbonara.food_id.clone(),
                    quantity: 1,
                    unit_price: dec("12.00"),
                },
            ],
        )
        .await
        .unwrap();
    assert_eq!(items.len(), 2);

    let summary = BillingAggregator::new(db.clone())
        .items_by_order(&order.order_id)
        .await
        .unwrap();

    assert_eq!(summary.order_id, order.order_id);
    assert_eq!(summary.payment_due, dec("21.50"));
    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.table_id, Some(table.table_id));
    assert_eq!(summary.table_number, Some(4));
    assert_eq!(summary.order_items.len(), 2);
}

#[tokio::test]
async fn billing_order_without_items_is_not_found() {
    let db = memory_db().await;

    let order = OrderRepository::new(db.clone())
        .create(OrderCreate { table_id: None })
        .await
        .unwrap();

    let err = BillingAggregator::new(db.clone())
        .items_by_order(&order.order_id)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn token_pair_is_persisted_on_the_user() {
    let db = memory_db().await;
    let jwt = test_jwt();
    let users = UserRepository::new(db.clone());

    let user = users
        .create(UserCreate {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            hashed_password: hash_password("hunter22").unwrap(),
            avatar: None,
        })
        .await
        .unwrap();
    assert_eq!(user.token_version, 0);
    assert!(verify_password("hunter22", &user.hashed_password));

    let pair = jwt
        .generate_all_tokens(&user.user_id, &user.email, &user.first_name, &user.last_name)
        .unwrap();
    users
        .update_tokens(&user.user_id, &pair.token, &pair.refresh_token)
        .await
        .unwrap();

    let stored = users
        .find_by_user_id(&user.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.token.as_deref(), Some(pair.token.as_str()));
    assert_eq!(stored.refresh_token.as_deref(), Some(pair.refresh_token.as_str()));
    assert_eq!(stored.token_version, 1);

    // the persisted token still validates and names the right subject
    let claims = jwt.validate_token(stored.token.as_deref().unwrap()).unwrap();
    assert_eq!(claims.sub, user.user_id);
    assert_eq!(claims.email, "ada@example.com");
}

#[tokio::test]
async fn token_update_for_unknown_user_is_rejected() {
    let db = memory_db().await;
    let users = UserRepository::new(db.clone());

    let err = users
        .update_tokens("no-such-user", "t", "r")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_signup_is_rejected_without_insert() {
    let db = memory_db().await;
    let users = UserRepository::new(db.clone());

    let create = UserCreate {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        hashed_password: hash_password("hunter22").unwrap(),
        avatar: None,
    };
    users.create(create.clone()).await.unwrap();

    // same email
    let err = users.create(create.clone()).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // same phone, different email
    let mut with_new_email = create.clone();
    with_new_email.email = "ada2@example.com".to_string();
    let err = users.create(with_new_email).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    let (total, _) = users.find_page(&PageParams::default()).await.unwrap();
    assert_eq!(total, 1);
}
