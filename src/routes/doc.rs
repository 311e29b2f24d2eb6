use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::{IdentityKey, LineItem, MergePolicy},
    catalog::ProductSelection,
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{CartLineView, CartView, ClaimCartRequest, RemoveCartItemRequest, UpdateCartItemRequest},
        contact::WhatsappLink,
        news::{CreateNewsRequest, NewsList, UpdateNewsRequest},
        orders::{LeadList, OrderList, StatusOption, UpdateOrderStatusRequest},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        quotes::{PageSummary, QuotePreview, QuoteRequest},
    },
    models::{CustomizationOption, Lead, NewsPost, OrderStatus, Product, QuoteOrder, User},
    notify::{Notice, NoticeLevel},
    quote::{CustomerDetails, CustomerInput, PageKind, RasterSize},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, contact, health, news, orders, products, quotes},
    session::CurrentUser,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::list_products,
        products::get_product,
        news::list_news,
        news::get_news,
        cart::get_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        cart::clear_cart,
        cart::claim_cart,
        quotes::preview_quote,
        quotes::export_quote,
        orders::list_orders,
        orders::get_order,
        contact::whatsapp_link,
        admin::list_products,
        admin::get_product,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::create_news,
        admin::update_news,
        admin::delete_news,
        admin::list_all_orders,
        admin::list_statuses,
        admin::get_order_admin,
        admin::update_order_status,
        admin::list_leads
    ),
    components(
        schemas(
            User,
            CurrentUser,
            Product,
            NewsPost,
            CustomizationOption,
            QuoteOrder,
            OrderStatus,
            Lead,
            LineItem,
            IdentityKey,
            MergePolicy,
            ProductSelection,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CartView,
            CartLineView,
            UpdateCartItemRequest,
            RemoveCartItemRequest,
            ClaimCartRequest,
            QuoteRequest,
            QuotePreview,
            PageSummary,
            PageKind,
            RasterSize,
            CustomerInput,
            CustomerDetails,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateNewsRequest,
            UpdateNewsRequest,
            NewsList,
            OrderList,
            LeadList,
            StatusOption,
            UpdateOrderStatusRequest,
            WhatsappLink,
            Notice,
            NoticeLevel,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<NewsPost>,
            ApiResponse<NewsList>,
            ApiResponse<CartView>,
            ApiResponse<QuotePreview>,
            ApiResponse<QuoteOrder>,
            ApiResponse<OrderList>,
            ApiResponse<LeadList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Customer accounts"),
        (name = "Products", description = "Active catalog"),
        (name = "News", description = "Storefront announcements"),
        (name = "Cart", description = "Session cart, merged by identity key"),
        (name = "Quotes", description = "Quote preview and PDF export"),
        (name = "Orders", description = "Customer quote history"),
        (name = "Contact", description = "WhatsApp links"),
        (name = "Admin", description = "Catalog, news, quote orders and leads"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
