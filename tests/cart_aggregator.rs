use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use rust_decimal::Decimal;
use uniform_quote_api::{
    cart::{
        Cart, CartAggregator, CartError, CartOwner, CartStore, IdentityKey, LineItem,
        LineItemInput, LocalCartStore, MergePolicy, Persistence, StoreError, identity_key,
    },
    dto::cart::UpdateCartItemRequest,
    notify::{NoticeBuffer, NoticeLevel},
};
use uuid::Uuid;

/// In-memory store that can be told to fail saves. Clones share state.
#[derive(Clone, Default)]
struct FlakyStore {
    carts: Arc<Mutex<HashMap<CartOwner, Vec<LineItem>>>>,
    fail_saves: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl CartStore for FlakyStore {
    async fn load(&self, owner: &CartOwner) -> Result<Vec<LineItem>, StoreError> {
        Ok(self
            .carts
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, owner: &CartOwner, items: &[LineItem]) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("disk full".into()));
        }
        self.carts.lock().unwrap().insert(*owner, items.to_vec());
        Ok(())
    }
}

fn price(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn candidate(product_id: &str, size: &str, color: &str, customizations: &[&str]) -> LineItemInput {
    LineItemInput {
        product_id: Some(product_id.to_string()),
        name: Some(format!("Product {product_id}")),
        unit_price: Some(price("50.00")),
        size: Some(size.to_string()),
        selected_color: Some(color.to_string()),
        customizations: Some(customizations.iter().map(|c| c.to_string()).collect()),
        ..Default::default()
    }
}

async fn open(
    store: &FlakyStore,
    owner: CartOwner,
) -> (CartAggregator<FlakyStore>, Arc<NoticeBuffer>) {
    let notices = Arc::new(NoticeBuffer::new());
    let aggregator = CartAggregator::open(store.clone(), owner, notices.clone())
        .await
        .unwrap();
    (aggregator, notices)
}

fn guest() -> CartOwner {
    CartOwner::Guest(Uuid::new_v4())
}

#[tokio::test]
async fn same_configuration_added_twice_merges_into_one_line() {
    let store = FlakyStore::default();
    let (mut cart, _) = open(&store, guest()).await;

    let polo = candidate("P1", "M", "Azul", &[]);
    assert!(matches!(cart.add_item(polo.clone(), 2).await.unwrap(), Persistence::Saved));
    assert!(matches!(cart.add_item(polo, 2).await.unwrap(), Persistence::Saved));

    assert_eq!(cart.cart().len(), 1);
    assert_eq!(cart.cart().items()[0].quantity, 4);
    assert_eq!(cart.total_item_count(), 4);
    assert_eq!(cart.total_price(), price("200.00"));
}

#[tokio::test]
async fn different_colors_stay_separate_lines() {
    let store = FlakyStore::default();
    let (mut cart, _) = open(&store, guest()).await;

    let _ = cart.add_item(candidate("P1", "M", "Azul", &[]), 1).await.unwrap();
    let _ = cart.add_item(candidate("P1", "M", "Vermelho", &[]), 1).await.unwrap();

    assert_eq!(cart.cart().len(), 2);
}

#[tokio::test]
async fn customization_order_does_not_matter() {
    let store = FlakyStore::default();
    let (mut cart, _) = open(&store, guest()).await;

    let _ = cart
        .add_item(candidate("P1", "M", "Azul", &["Bordado", "Nome"]), 1)
        .await
        .unwrap();
    let _ = cart
        .add_item(candidate("P1", "M", "Azul", &["Nome", "Bordado"]), 1)
        .await
        .unwrap();

    assert_eq!(cart.cart().len(), 1);
    assert_eq!(cart.cart().items()[0].quantity, 2);
    assert_eq!(
        identity_key(&cart.cart().items()[0]),
        IdentityKey::new("P1", "M", "Azul", &["Nome", "Bordado"])
    );
}

#[tokio::test]
async fn merging_keeps_the_existing_price_and_attributes() {
    let mut cart = Cart::new();
    cart.add_item(candidate("P1", "M", "Azul", &[]), 1).unwrap();

    let mut cheaper = candidate("P1", "M", "Azul", &[]);
    cheaper.unit_price = Some(price("10.00"));
    cheaper.name = Some("Renamed".into());
    cart.add_item(cheaper, 3).unwrap();

    let line = &cart.items()[0];
    assert_eq!(line.quantity, 4);
    assert_eq!(line.unit_price, price("50.00"));
    assert_eq!(line.name, "Product P1");
}

#[tokio::test]
async fn distinct_keys_give_one_line_each_in_insertion_order() {
    let mut cart = Cart::new();
    let picks = [
        candidate("P1", "M", "Azul", &[]),
        candidate("P2", "G", "", &[]),
        candidate("P1", "G", "Azul", &[]),
        candidate("P2", "G", "", &[]),
        candidate("P1", "M", "Azul", &["Bordado"]),
    ];
    for pick in picks {
        cart.add_item(pick, 1).unwrap();
    }

    let ids: Vec<_> = cart
        .items()
        .iter()
        .map(|item| (item.product_id.as_str(), item.size.as_str()))
        .collect();
    assert_eq!(ids, [("P1", "M"), ("P2", "G"), ("P1", "G"), ("P1", "M")]);
}

#[tokio::test]
async fn update_to_zero_is_the_same_as_remove() {
    let mut updated = Cart::new();
    let mut removed = Cart::new();
    for cart in [&mut updated, &mut removed] {
        cart.add_item(candidate("P1", "M", "Azul", &[]), 2).unwrap();
        cart.add_item(candidate("P2", "G", "Azul", &[]), 1).unwrap();
    }
    let key = IdentityKey::new("P1", "M", "Azul", &[] as &[&str]);

    assert!(updated.update_quantity(&key, 0).unwrap());
    assert!(removed.remove_item(&key));
    assert_eq!(updated, removed);

    assert!(updated.update_quantity(&IdentityKey::new("P2", "G", "Azul", &[] as &[&str]), -3).unwrap());
    assert!(updated.is_empty());
}

#[tokio::test]
async fn unknown_keys_are_a_no_op() {
    let store = FlakyStore::default();
    let (mut cart, _) = open(&store, guest()).await;
    let _ = cart.add_item(candidate("P1", "M", "Azul", &[]), 1).await.unwrap();
    let saves = store.saves.load(Ordering::SeqCst);

    let missing = IdentityKey::new("P9", "", "", &[] as &[&str]);
    assert!(matches!(cart.remove_item(&missing).await, Persistence::Unchanged));
    assert!(matches!(
        cart.update_quantity(&missing, 5).await.unwrap(),
        Persistence::Unchanged
    ));
    assert_eq!(store.saves.load(Ordering::SeqCst), saves);
    assert_eq!(cart.cart().len(), 1);
}

#[tokio::test]
async fn invalid_candidates_are_rejected_before_mutation() {
    let store = FlakyStore::default();
    let (mut cart, _) = open(&store, guest()).await;

    let err = cart
        .add_item(candidate("P1", "M", "Azul", &[]), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::InvalidQuantity(0)));

    let err = cart
        .add_item(candidate("   ", "M", "Azul", &[]), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::MissingProductId));

    let mut negative = candidate("P1", "M", "Azul", &[]);
    negative.unit_price = Some(price("-1"));
    assert!(matches!(
        cart.add_item(negative, 1).await.unwrap_err(),
        CartError::NegativePrice(_)
    ));

    assert!(cart.cart().is_empty());
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn legacy_single_image_becomes_the_image_list() {
    let mut pick = candidate("P1", "M", "Azul", &[]);
    pick.image = Some("https://cdn.example.com/p1.jpg".into());

    let mut cart = Cart::new();
    cart.add_item(pick, 1).unwrap();
    assert_eq!(
        cart.items()[0].primary_image(),
        Some("https://cdn.example.com/p1.jpg")
    );
}

#[tokio::test]
async fn totals_do_not_depend_on_insertion_order() {
    let picks = vec![
        (candidate("P1", "M", "Azul", &[]), 3),
        (
            LineItemInput {
                unit_price: Some(price("19.99")),
                ..candidate("P2", "G", "", &["Bordado"])
            },
            2,
        ),
        (
            LineItemInput {
                unit_price: Some(price("7.25")),
                ..candidate("P3", "", "", &[])
            },
            5,
        ),
    ];

    let mut forward = Cart::new();
    for (pick, qty) in picks.clone() {
        forward.add_item(pick, qty).unwrap();
    }
    let mut backward = Cart::new();
    for (pick, qty) in picks.into_iter().rev() {
        backward.add_item(pick, qty).unwrap();
    }

    assert_eq!(forward.total_price(), backward.total_price());
    assert_eq!(forward.total_price(), price("226.23"));
    assert_eq!(forward.total_item_count(), 10);
}

#[tokio::test]
async fn failed_save_keeps_the_in_memory_cart_and_warns() {
    let store = FlakyStore::default();
    store.fail_saves.store(true, Ordering::SeqCst);
    let (mut cart, notices) = open(&store, guest()).await;

    let outcome = cart
        .add_item(candidate("P1", "M", "Azul", &[]), 2)
        .await
        .unwrap();

    assert!(outcome.is_failed());
    assert_eq!(cart.cart().len(), 1);
    let raised = notices.drain();
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].level, NoticeLevel::Warning);
}

#[tokio::test]
async fn cart_survives_reopening_from_the_store() {
    let store = FlakyStore::default();
    let owner = guest();
    {
        let (mut cart, _) = open(&store, owner).await;
        let _ = cart.add_item(candidate("P1", "M", "Azul", &[]), 2).await.unwrap();
    }
    let (cart, _) = open(&store, owner).await;
    assert_eq!(cart.total_item_count(), 2);
}

#[tokio::test]
async fn local_store_keeps_guests_apart() {
    let store = LocalCartStore::new(Duration::from_secs(60));
    let (a, b) = (guest(), guest());
    let notices = Arc::new(NoticeBuffer::new());

    let mut cart_a = CartAggregator::open(store.clone(), a, notices.clone()).await.unwrap();
    let _ = cart_a.add_item(candidate("P1", "M", "Azul", &[]), 1).await.unwrap();

    let cart_b = CartAggregator::open(store.clone(), b, notices.clone()).await.unwrap();
    assert!(cart_b.cart().is_empty());

    let mut reopened = CartAggregator::open(store.clone(), a, notices).await.unwrap();
    assert_eq!(reopened.cart().len(), 1);
    assert!(matches!(reopened.clear().await, Persistence::Saved));
    assert!(store.load(&a).await.unwrap().is_empty());
}

#[tokio::test]
async fn merge_policies_decide_what_the_account_keeps() {
    let store = FlakyStore::default();
    let user = CartOwner::User(Uuid::new_v4());

    let mut guest_cart = Cart::new();
    guest_cart.add_item(candidate("P1", "M", "Azul", &[]), 2).unwrap();
    guest_cart.add_item(candidate("P2", "G", "", &[]), 1).unwrap();

    let seed_account = |store: &FlakyStore| {
        let mut account = Cart::new();
        account.add_item(candidate("P1", "M", "Azul", &[]), 1).unwrap();
        store.carts.lock().unwrap().insert(user, account.into_items());
    };

    seed_account(&store);
    let (mut account, _) = open(&store, user).await;
    let _ = account.absorb(guest_cart.clone(), MergePolicy::Union).await;
    assert_eq!(account.cart().len(), 2);
    assert_eq!(account.total_item_count(), 4);

    seed_account(&store);
    let (mut account, _) = open(&store, user).await;
    assert!(matches!(
        account.absorb(guest_cart.clone(), MergePolicy::AccountWins).await,
        Persistence::Unchanged
    ));
    assert_eq!(account.total_item_count(), 1);

    seed_account(&store);
    let (mut account, _) = open(&store, user).await;
    let _ = account.absorb(guest_cart, MergePolicy::GuestWins).await;
    assert_eq!(account.total_item_count(), 3);
}

#[tokio::test]
async fn client_sent_keys_match_whatever_the_label_order() {
    let store = FlakyStore::default();
    let (mut cart, _) = open(&store, guest()).await;
    let _ = cart
        .add_item(candidate("P1", "M", "Azul", &["Printing", "Embroidery"]), 3)
        .await
        .unwrap();

    let key: IdentityKey = serde_json::from_value(serde_json::json!({
        "product_id": "P1",
        "size": "M",
        "selected_color": "Azul",
        "customizations": "Printing, Embroidery"
    }))
    .unwrap();
    assert_eq!(key, identity_key(&cart.cart().items()[0]));

    assert!(matches!(
        cart.update_quantity(&key, 5).await.unwrap(),
        Persistence::Saved
    ));
    assert_eq!(cart.total_item_count(), 5);

    let request: UpdateCartItemRequest = serde_json::from_value(serde_json::json!({
        "key": {
            "product_id": " P1 ",
            "size": "M",
            "selected_color": "Azul",
            "customizations": "Printing,Embroidery,"
        },
        "quantity": 0
    }))
    .unwrap();
    assert!(matches!(
        cart.update_quantity(&request.key, request.quantity).await.unwrap(),
        Persistence::Saved
    ));
    assert!(cart.cart().is_empty());
}
