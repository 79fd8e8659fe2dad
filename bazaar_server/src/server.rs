use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use bazaar_engine::{CartApi, CatalogApi, CheckoutApi, PaymentFlowApi, SqliteDatabase};

use crate::{
    config::{ServerConfig, WebhookSettings},
    errors::ServerError,
    integrations::RazorpayGateway,
    routes::{
        health,
        AddProductRoute,
        AddToCartRoute,
        CancelOrderRoute,
        CartItemsRoute,
        ClearCartRoute,
        CreateOrderRoute,
        CreatePaymentRoute,
        DeactivateProductRoute,
        GetOrderRoute,
        GetProductRoute,
        ListOrdersRoute,
        ListProductsRoute,
        PaymentWebhookRoute,
        RemoveCartItemRoute,
        UpdateProductRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = RazorpayGateway::new(config.razorpay.clone())?;
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::BackendError(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
) -> Result<Server, ServerError> {
    let webhook_settings = WebhookSettings::from_config(&config);
    let srv = HttpServer::new(move || {
        let catalog_api = CatalogApi::new(db.clone());
        let cart_api = CartApi::new(db.clone());
        let checkout_api = CheckoutApi::new(db.clone());
        let payment_api = PaymentFlowApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bazaar::access_log"))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(payment_api))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(webhook_settings.clone()))
            .service(health)
            .service(AddProductRoute::<SqliteDatabase>::new())
            .service(ListProductsRoute::<SqliteDatabase>::new())
            .service(GetProductRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeactivateProductRoute::<SqliteDatabase>::new())
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(CartItemsRoute::<SqliteDatabase>::new())
            .service(RemoveCartItemRoute::<SqliteDatabase>::new())
            .service(ClearCartRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(GetOrderRoute::<SqliteDatabase>::new())
            .service(ListOrdersRoute::<SqliteDatabase>::new())
            .service(CancelOrderRoute::<SqliteDatabase>::new())
            .service(CreatePaymentRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(PaymentWebhookRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
