//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat
//! and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current
//! thread will cause the current worker to stop processing new requests. For this reason, any
//! long, non-cpu-bound operation (I/O, database calls, gateway calls) is expressed as an async
//! function so worker threads keep serving other requests while the call is in flight.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use bazaar_common::Paise;
use bazaar_engine::{
    db_types::{NewCartItem, NewProduct, OrderId, ProductId, UserId},
    traits::{CommerceDatabase, PaymentGatewayClient},
    CartApi,
    CatalogApi,
    CheckoutApi,
    PaymentFlowApi,
    PaymentFlowError,
    WebhookOutcome,
};
use log::*;

use crate::{
    config::WebhookSettings,
    data_objects::{
        ApiResponse,
        CartItemRequest,
        CartItemResponse,
        CreateOrderRequest,
        OrderResponse,
        OrderSummary,
        OrdersQuery,
        PaymentIntentResponse,
        ProductRequest,
        ProductResponse,
        ProductUpdateBody,
    },
    errors::ServerError,
};

// Actix cannot handle generics in handlers, so routes are registered manually via the `route!`
// macro: it emits a unit struct per route whose `HttpServiceFactory` impl instantiates the generic
// handler for a concrete backend.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Products  ---------------------------------------------------------
route!(add_product => Post "/api/products" impl CommerceDatabase);
pub async fn add_product<B>(
    body: web::Json<ProductRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
{
    let req = body.into_inner();
    trace!("💻️ POST add product {}", req.name);
    validate_product_request(&req)?;
    let mut product = NewProduct::new(req.name, Paise::from_rupees(req.price), req.stock);
    product.description = req.description;
    product.discount_percentage = req.discount_percentage;
    let product = api.add_product(product).await?;
    let response = ApiResponse::success(ProductResponse::from(product), "Product added successfully!");
    Ok(HttpResponse::Created().json(response))
}

route!(list_products => Get "/api/products" impl CommerceDatabase);
pub async fn list_products<B>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError>
where B: CommerceDatabase {
    trace!("💻️ GET product list");
    let products = api.products(true).await?.into_iter().map(ProductResponse::from).collect::<Vec<_>>();
    let message = if products.is_empty() {
        "No products available at the moment.".to_string()
    } else {
        format!("Successfully retrieved {} products.", products.len())
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(products, message)))
}

route!(get_product => Get "/api/products/{id}" impl CommerceDatabase);
pub async fn get_product<B>(path: web::Path<String>, api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError>
where B: CommerceDatabase {
    let id = ProductId::from(path.into_inner());
    trace!("💻️ GET product {id}");
    let product = api.product(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ProductResponse::from(product), "Product retrieved successfully.")))
}

route!(update_product => Put "/api/products/{id}" impl CommerceDatabase);
pub async fn update_product<B>(
    path: web::Path<String>,
    body: web::Json<ProductUpdateBody>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
{
    let id = ProductId::from(path.into_inner());
    let update = body.into_inner();
    trace!("💻️ PUT update product {id}");
    validate_product_update(&update)?;
    let product = api.update_product(&id, update.into_update()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ProductResponse::from(product), "Product updated successfully!")))
}

route!(deactivate_product => Delete "/api/products/{id}" impl CommerceDatabase);
pub async fn deactivate_product<B>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
{
    let id = ProductId::from(path.into_inner());
    trace!("💻️ DELETE deactivate product {id}");
    api.deactivate_product(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Product has been deactivated successfully.")))
}

//----------------------------------------------     Cart    ---------------------------------------------------------
route!(add_to_cart => Post "/api/cart/add" impl CommerceDatabase);
pub async fn add_to_cart<B>(
    body: web::Json<CartItemRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
{
    let req = body.into_inner();
    trace!("💻️ POST add {}x {} to cart for {}", req.quantity, req.product_id, req.user_id);
    if req.quantity <= 0 {
        return Err(ServerError::InvalidRequestBody("Quantity must be greater than zero".to_string()));
    }
    let line = api
        .add_item(NewCartItem {
            user_id: UserId::from(req.user_id),
            product_id: ProductId::from(req.product_id),
            quantity: req.quantity,
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CartItemResponse::from(line), "Item added to cart.")))
}

route!(cart_items => Get "/api/cart/{user_id}" impl CommerceDatabase);
pub async fn cart_items<B>(path: web::Path<String>, api: web::Data<CartApi<B>>) -> Result<HttpResponse, ServerError>
where B: CommerceDatabase {
    let user_id = UserId::from(path.into_inner());
    trace!("💻️ GET cart for {user_id}");
    let items = api.items(&user_id).await?.into_iter().map(CartItemResponse::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(ApiResponse::success(items, "Cart retrieved successfully.")))
}

route!(remove_cart_item => Delete "/api/cart/items/{id}" impl CommerceDatabase);
pub async fn remove_cart_item<B>(path: web::Path<i64>, api: web::Data<CartApi<B>>) -> Result<HttpResponse, ServerError>
where B: CommerceDatabase {
    let id = path.into_inner();
    trace!("💻️ DELETE cart item {id}");
    api.remove_item(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Item removed from cart.")))
}

route!(clear_cart => Delete "/api/cart/{user_id}/clear" impl CommerceDatabase);
pub async fn clear_cart<B>(path: web::Path<String>, api: web::Data<CartApi<B>>) -> Result<HttpResponse, ServerError>
where B: CommerceDatabase {
    let user_id = UserId::from(path.into_inner());
    trace!("💻️ DELETE clear cart for {user_id}");
    api.clear(&user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Cart cleared successfully")))
}

//----------------------------------------------    Orders   ---------------------------------------------------------
route!(create_order => Post "/api/orders" impl CommerceDatabase);
/// The checkout endpoint. Converts the user's cart into a priced, stock-committed order, or fails
/// cleanly leaving cart and stock untouched.
pub async fn create_order<B>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
{
    let user_id = UserId::from(body.into_inner().user_id);
    debug!("💻️ POST checkout for {user_id}");
    let detail = api.create_order(&user_id).await?;
    let response = ApiResponse::success(OrderResponse::from(detail), "Order created successfully!");
    Ok(HttpResponse::Created().json(response))
}

route!(get_order => Get "/api/orders/{order_id}" impl CommerceDatabase);
pub async fn get_order<B>(path: web::Path<String>, api: web::Data<CheckoutApi<B>>) -> Result<HttpResponse, ServerError>
where B: CommerceDatabase {
    let order_id = OrderId::from(path.into_inner());
    trace!("💻️ GET order {order_id}");
    let detail = api.order_detail(&order_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(OrderResponse::from(detail), "Order retrieved successfully.")))
}

route!(list_orders => Get "/api/orders" impl CommerceDatabase);
pub async fn list_orders<B>(
    query: web::Query<OrdersQuery>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
{
    let user_id = query.into_inner().user_id.map(UserId::from);
    trace!("💻️ GET order list");
    let orders = api.orders(user_id.as_ref()).await?.into_iter().map(OrderSummary::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(ApiResponse::success(orders, "Orders retrieved successfully.")))
}

route!(cancel_order => Post "/api/orders/{order_id}/cancel" impl CommerceDatabase);
pub async fn cancel_order<B>(
    path: web::Path<String>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
{
    let order_id = OrderId::from(path.into_inner());
    debug!("💻️ POST cancel order {order_id}");
    let order = api.cancel_order(&order_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(OrderSummary::from(order), "Order cancelled.")))
}

//----------------------------------------------   Payments  ---------------------------------------------------------
route!(create_payment => Post "/api/payments/{order_id}" impl CommerceDatabase, PaymentGatewayClient);
/// Creates a remote payment intent for a fresh order and returns the gateway reference the payer
/// is redirected to.
pub async fn create_payment<B, G>(
    path: web::Path<String>,
    api: web::Data<PaymentFlowApi<B>>,
    gateway: web::Data<G>,
) -> Result<HttpResponse, ServerError>
where
    B: CommerceDatabase,
    G: PaymentGatewayClient,
{
    let order_id = OrderId::from(path.into_inner());
    debug!("💻️ POST create payment intent for order {order_id}");
    let intent = api.create_payment_intent(&order_id, gateway.get_ref()).await?;
    let response = ApiResponse::success(PaymentIntentResponse::from(intent), "Payment intent created.");
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Webhook   ---------------------------------------------------------
route!(payment_webhook => Post "/webhook/razorpay" impl CommerceDatabase);
/// Webhook consumer for gateway payment events.
///
/// Responses must always be in the 200 range, otherwise the gateway will keep retrying the
/// delivery; every outcome, including signature failures and internal faults, is converted into an
/// acknowledgement whose body distinguishes the cases.
pub async fn payment_webhook<B>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<PaymentFlowApi<B>>,
    settings: web::Data<WebhookSettings>,
) -> HttpResponse
where
    B: CommerceDatabase,
{
    trace!("🔔️ Received webhook request: {}", req.uri());
    let signature = req.headers().get("X-Razorpay-Signature").and_then(|v| v.to_str().ok()).unwrap_or_default();
    let result = match api.process_webhook(&body, signature, settings.secret.reveal()).await {
        Ok(WebhookOutcome::Processed { order_id }) => {
            info!("🔔️ Payment successful for order {order_id}");
            ApiResponse::message("Webhook processed successfully")
        },
        Ok(WebhookOutcome::AlreadyProcessed { order_id }) => {
            info!("🔔️ Duplicate capture for order {order_id} acknowledged");
            ApiResponse::message("Webhook already processed")
        },
        Ok(WebhookOutcome::Ignored { event }) => {
            debug!("🔔️ Ignoring webhook event type {event}");
            ApiResponse::message(format!("Event {event} ignored"))
        },
        Ok(WebhookOutcome::PaymentRecordNotFound { reference }) => {
            warn!("🔔️ No payment record for gateway reference {reference}");
            ApiResponse::error("Payment record not found", "PAYMENT_RECORD_NOT_FOUND")
        },
        Err(PaymentFlowError::SignatureVerificationFailed) => {
            warn!("🔔️ Rejected webhook delivery with an invalid signature");
            ApiResponse::error("Invalid webhook signature!", "SIGNATURE_VERIFICATION_FAILED")
        },
        Err(PaymentFlowError::PayloadError(e)) => {
            warn!("🔔️ Could not parse webhook payload. {e}");
            ApiResponse::error("Could not read the webhook payload", "WEBHOOK_PAYLOAD_INVALID")
        },
        Err(e) => {
            error!("🔔️ Error processing webhook: {e}");
            ApiResponse::error("Webhook processing failed", "INTERNAL_ERROR")
        },
    };
    HttpResponse::Ok().json(result)
}

//----------------------------------------------  Validation  --------------------------------------------------------
fn validate_product_request(req: &ProductRequest) -> Result<(), ServerError> {
    if req.name.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("Product name is required".to_string()));
    }
    if req.price <= 0.0 {
        return Err(ServerError::InvalidRequestBody("Price must be greater than zero".to_string()));
    }
    if !(0.0..=100.0).contains(&req.discount_percentage) {
        return Err(ServerError::InvalidRequestBody("Discount percentage must be between 0 and 100".to_string()));
    }
    if req.stock < 0 {
        return Err(ServerError::InvalidRequestBody("Stock cannot be negative".to_string()));
    }
    Ok(())
}

fn validate_product_update(update: &ProductUpdateBody) -> Result<(), ServerError> {
    if update.is_empty() {
        return Err(ServerError::InvalidRequestBody("The update request carries no fields".to_string()));
    }
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(ServerError::InvalidRequestBody("Product name cannot be empty".to_string()));
        }
    }
    if let Some(price) = update.price {
        if price <= 0.0 {
            return Err(ServerError::InvalidRequestBody("Price must be greater than zero".to_string()));
        }
    }
    if let Some(discount) = update.discount_percentage {
        if !(0.0..=100.0).contains(&discount) {
            return Err(ServerError::InvalidRequestBody("Discount percentage must be between 0 and 100".to_string()));
        }
    }
    if let Some(stock) = update.stock {
        if stock < 0 {
            return Err(ServerError::InvalidRequestBody("Stock cannot be negative".to_string()));
        }
    }
    Ok(())
}
