use crate::{
    dto::contact::{WhatsappLink, WhatsappQuery},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::{order_service, product_service},
    session::Session,
    state::AppState,
    whatsapp,
};

/// Prefilled WhatsApp link for a product, a quote or a general enquiry.
///
/// The quote status is only mentioned when the code is one of the signed-in
/// customer's own quotes; anyone else gets the plain quote message.
pub async fn whatsapp_link(
    state: &AppState,
    session: &Session,
    query: WhatsappQuery,
) -> AppResult<ApiResponse<WhatsappLink>> {
    let seller = &state.config.quote.seller;

    let order_code = query
        .order_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());

    let text = match (query.product_id, order_code) {
        (Some(product_id), _) => {
            let product = product_service::find_product(state, product_id).await?;
            whatsapp::product_message(&product)
        }
        (None, Some(code)) => {
            let status = match &session.current_user {
                Some(user) => order_service::own_status_by_code(state, user.id, code).await?,
                None => None,
            };
            whatsapp::order_message(code, status)
        }
        (None, None) => whatsapp::general_message(&seller.name),
    };

    let data = WhatsappLink {
        url: whatsapp::link(&seller.whatsapp_number, &text),
        text,
    };
    Ok(ApiResponse::success("WhatsApp link", data, Some(Meta::empty())))
}
