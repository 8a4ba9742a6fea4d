use super::error::catch_errors;
use super::handler;
use crate::application_port::ProductService;
use crate::domain_model::{ProductDraft, SearchParams};
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let create = warp::path("products")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json::<ProductDraft>())
        .and(with(server.product_service.clone()))
        .and_then(|body: ProductDraft, product_service: Arc<dyn ProductService>| {
            catch_errors(handler::create_product(body, product_service))
        });

    let search = warp::path("products")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<Vec<(String, String)>>())
        .and(with(server.product_service.clone()))
        .and_then(|pairs: Vec<(String, String)>, product_service: Arc<dyn ProductService>| {
            let query = SearchParams::from_pairs(pairs);
            catch_errors(handler::search_products(query, product_service))
        });

    let get_by_id = warp::path("products")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with(server.product_service.clone()))
        .and_then(|id: String, product_service: Arc<dyn ProductService>| {
            catch_errors(handler::get_product_by_id(id, product_service))
        });

    create.or(search).or(get_by_id)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
