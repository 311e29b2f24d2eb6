use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use uniform_quote_api::{
    cart::{Cart, LineItemInput},
    quote::{
        CustomerDetails, CustomerInput, PageFormat, PageKind, QuoteDocument, QuoteError,
        RasterSize, format_currency, order_code, page_count, paginate,
    },
    session::CurrentUser,
};
use uuid::Uuid;

fn cart_with(lines: usize) -> Cart {
    let mut cart = Cart::new();
    for n in 0..lines {
        cart.add_item(
            LineItemInput {
                product_id: Some(format!("P{n}")),
                name: Some(format!("Item {n}")),
                unit_price: Some(Decimal::new(1000, 2)),
                ..Default::default()
            },
            1,
        )
        .unwrap();
    }
    cart
}

fn signed_in() -> CurrentUser {
    CurrentUser {
        id: Uuid::new_v4(),
        email: "ana@example.com".into(),
        display_name: "Ana Souza".into(),
    }
}

#[test]
fn thirty_seven_items_at_fifteen_per_page() {
    let cart = cart_with(37);
    let plan = paginate(cart.items(), 15).unwrap();

    let shape: Vec<_> = plan
        .pages()
        .iter()
        .map(|page| (page.number, page.kind, page.items.len()))
        .collect();
    assert_eq!(
        shape,
        [
            (1, PageKind::Header, 15),
            (2, PageKind::Continuation, 15),
            (3, PageKind::Continuation, 7),
            (4, PageKind::Summary, 0),
        ]
    );
    assert_eq!(plan.len(), page_count(37, 15));
}

#[test]
fn a_full_first_page_is_followed_directly_by_the_summary() {
    let cart = cart_with(15);
    let plan = paginate(cart.items(), 15).unwrap();

    let kinds: Vec<_> = plan.pages().iter().map(|page| page.kind).collect();
    assert_eq!(kinds, [PageKind::Header, PageKind::Summary]);
    assert_eq!(plan.pages()[0].items.len(), 15);
}

#[test]
fn page_count_matches_the_plan_for_many_sizes() {
    for items in 1..=50 {
        for per_page in [1, 2, 7, 15, 20] {
            let cart = cart_with(items);
            let plan = paginate(cart.items(), per_page).unwrap();
            let expected = 1 + items.saturating_sub(per_page).div_ceil(per_page) + 1;
            assert_eq!(plan.len(), expected, "{items} items at {per_page} per page");
            assert_eq!(page_count(items, per_page), expected);
        }
    }
}

#[test]
fn items_keep_their_order_across_pages() {
    let cart = cart_with(23);
    let plan = paginate(cart.items(), 10).unwrap();

    let flattened: Vec<_> = plan
        .item_pages()
        .flat_map(|page| page.items.iter().map(|item| item.product_id.clone()))
        .collect();
    let original: Vec<_> = cart.items().iter().map(|item| item.product_id.clone()).collect();
    assert_eq!(flattened, original);

    let firsts: Vec<_> = plan.pages().iter().map(|page| page.first_item).collect();
    assert_eq!(firsts, [0, 10, 20, 23]);
}

#[test]
fn zero_capacity_and_empty_carts_are_rejected() {
    let cart = cart_with(3);
    assert!(matches!(
        paginate(cart.items(), 0),
        Err(QuoteError::InvalidCapacity)
    ));
    assert!(matches!(paginate(&[], 15), Err(QuoteError::EmptyCart)));

    let err = QuoteDocument::from_cart(
        &Cart::new(),
        CustomerDetails::default(),
        "ORC-1-ABC".into(),
        Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(err, QuoteError::EmptyCart));
    assert!(err.is_validation());
}

#[test]
fn document_freezes_items_and_total() {
    let mut cart = cart_with(2);
    let doc = QuoteDocument::from_cart(
        &cart,
        CustomerDetails::default(),
        "ORC-1-ABC".into(),
        Utc::now(),
    )
    .unwrap();

    cart.clear();
    assert_eq!(doc.items.len(), 2);
    assert_eq!(doc.total, Decimal::new(2000, 2));
    assert_eq!(doc.page_count(15), 2);
}

#[test]
fn typed_customer_fields_win_over_the_profile() {
    let user = signed_in();
    let input = CustomerInput {
        name: Some("  Compras Escola  ".into()),
        email: Some("   ".into()),
        phone: Some("+55 11 99999-0000".into()),
        ..Default::default()
    };

    let details = CustomerDetails::resolve(&input, Some(&user));
    assert_eq!(details.name, "Compras Escola");
    assert_eq!(details.email, "ana@example.com");
    assert_eq!(details.phone, "+55 11 99999-0000");
    assert_eq!(details.company, "");

    let guest = CustomerDetails::resolve(&CustomerInput::default(), None);
    assert_eq!(guest, CustomerDetails::default());
}

#[test]
fn guests_must_type_name_email_and_phone() {
    let mut input = CustomerInput {
        name: Some("Ana".into()),
        email: Some("ana@example.com".into()),
        ..Default::default()
    };
    assert!(matches!(
        input.require_contact(),
        Err(QuoteError::MissingCustomerField("phone"))
    ));

    input.phone = Some("11 99999-0000".into());
    assert!(input.require_contact().is_ok());
}

#[test]
fn order_codes_carry_the_timestamp_and_a_base36_suffix() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let code = order_code::generate(now);

    let parts: Vec<_> = code.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "ORC");
    assert_eq!(parts[1], now.timestamp_millis().to_string());
    assert_eq!(parts[2].len(), order_code::SUFFIX_LEN);
    assert!(
        parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    );

    assert_ne!(code, order_code::generate(now));
}

#[test]
fn a4_content_box_in_pixels() {
    let a4 = PageFormat::A4;
    assert_eq!(a4.content_width_mm(), 195.0);
    assert_eq!(a4.content_height_mm(), 282.0);
    assert_eq!(
        a4.content_box_px(1.0),
        RasterSize {
            width_px: 737,
            height_px: 1066,
        }
    );
    assert_eq!(a4.content_box_px(2.0).width_px, 1474);

    assert!(!a4.with_margin(120.0).is_valid());
}

#[test]
fn currency_has_two_fixed_decimals() {
    assert_eq!(format_currency("R$", Decimal::new(12345, 1)), "R$ 1234.50");
    assert_eq!(format_currency("R$", Decimal::new(5, 3)), "R$ 0.01");
    assert_eq!(format_currency("R$", Decimal::ZERO), "R$ 0.00");
}
