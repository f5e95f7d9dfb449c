use std::io::Read;
use std::sync::{Arc, Mutex};

use iron::headers::{AccessControlAllowMethods, AccessControlAllowOrigin, ContentType};
use iron::method::Method;
use iron::mime::{Mime, SubLevel, TopLevel};
use iron::{status, AfterMiddleware, Handler, IronError, IronResult, Request, Response};
use router::Router;
use serde::Serialize;
use serde_json;
use url::form_urlencoded;

use error::PostError;
use model::{Direction, NewPost, PostUpdate, SortField};
use store::PostStore;

/// Unwrap a `Result<_, PostError>` or return it as an `IronError`.
macro_rules! try_post {
    ( $e:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => return Err(IronError::from(e)),
        }
    }
}

/// Lock the store, recovering it from a poisoned lock.
/// Store operations never leave the collection half-mutated.
macro_rules! lock {
    ( $e:expr ) => {
        match $e.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Get the value of a parameter in the URI.
/// If we could not obtain the parameter list, return `500 Internal Server Error`.
macro_rules! get_http_param {
    ( $r:expr, $e:expr ) => {
        match $r.extensions.get::<Router>() {
            Some(router) => {
                match router.find($e) {
                    Some(val) => val.to_string(),
                    None => return Ok(Response::with(status::BadRequest)),
                }
            }
            None => return Ok(Response::with(status::InternalServerError)),
        }
    }
}

pub struct Handlers {
    pub list: ListPostsHandler,
    pub search: SearchPostsHandler,
    pub create: CreatePostHandler,
    pub update: UpdatePostHandler,
    pub delete: DeletePostHandler,
}

impl Handlers {
    pub fn new(store: PostStore) -> Handlers {
        let store = Arc::new(Mutex::new(store));
        Handlers {
            list: ListPostsHandler::new(store.clone()),
            search: SearchPostsHandler::new(store.clone()),
            create: CreatePostHandler::new(store.clone()),
            update: UpdatePostHandler::new(store.clone()),
            delete: DeletePostHandler::new(store.clone()),
        }
    }
}

fn json_response<T: Serialize>(code: status::Status, value: &T) -> IronResult<Response> {
    match serde_json::to_string(value) {
        Ok(payload) => Ok(Response::with((code, payload))),
        Err(e) => Err(IronError::new(e, status::InternalServerError)),
    }
}

/// The first value of `name` in the query string. Empty values count as absent.
fn query_param(req: &Request, name: &str) -> Option<String> {
    let query = match req.url.query() {
        Some(query) => query,
        None => return None,
    };
    form_urlencoded::parse(query.as_bytes())
        .find(|&(ref key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn is_json(req: &Request) -> bool {
    match req.headers.get::<ContentType>() {
        Some(&ContentType(Mime(TopLevel::Application, SubLevel::Json, _))) => true,
        Some(&ContentType(Mime(TopLevel::Application, SubLevel::Ext(ref sub), _))) => {
            sub.ends_with("+json")
        }
        _ => false,
    }
}

fn read_body(req: &mut Request) -> Result<String, PostError> {
    let mut payload = String::new();
    match req.body.read_to_string(&mut payload) {
        Ok(_) => Ok(payload),
        Err(_) => Err(PostError::InvalidRequest),
    }
}

pub struct ListPostsHandler {
    store: Arc<Mutex<PostStore>>,
}

impl ListPostsHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> ListPostsHandler {
        ListPostsHandler { store: store }
    }
}

impl Handler for ListPostsHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let sort_by = match query_param(req, "sort") {
            Some(field) => Some(try_post!(field.parse::<SortField>())),
            None => None,
        };
        let direction = match query_param(req, "direction") {
            Some(direction) => Some(try_post!(direction.parse::<Direction>())),
            None => None,
        };

        let mut store = lock!(self.store);
        json_response(status::Ok, store.list_posts(sort_by, direction))
    }
}

pub struct SearchPostsHandler {
    store: Arc<Mutex<PostStore>>,
}

impl SearchPostsHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> SearchPostsHandler {
        SearchPostsHandler { store: store }
    }
}

impl Handler for SearchPostsHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let title = query_param(req, "title").unwrap_or_default();
        let content = query_param(req, "content").unwrap_or_default();

        let matched = lock!(self.store).search_posts(&title, &content);
        debug!("search title={:?} content={:?} matched {}", title, content, matched.len());
        json_response(status::Ok, &matched)
    }
}

pub struct CreatePostHandler {
    store: Arc<Mutex<PostStore>>,
}

impl CreatePostHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> CreatePostHandler {
        CreatePostHandler { store: store }
    }
}

impl Handler for CreatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        if !is_json(req) {
            return Err(PostError::InvalidRequest.into());
        }
        let payload = try_post!(read_body(req));
        let new_post = try_post!(NewPost::from_json(&payload));

        let post = lock!(self.store).create_post(new_post);
        info!("created post {}", post.id);
        json_response(status::Created, &post)
    }
}

pub struct UpdatePostHandler {
    store: Arc<Mutex<PostStore>>,
}

impl UpdatePostHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> UpdatePostHandler {
        UpdatePostHandler { store: store }
    }
}

impl Handler for UpdatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let post_id = get_http_param!(req, "id");

        // An id that is not a number can't name any post.
        let id = try_post!(post_id.parse::<u64>().map_err(|_| PostError::NotFound));

        let payload = try_post!(read_body(req));
        let update = try_post!(PostUpdate::from_json(&payload));

        let post = try_post!(lock!(self.store).update_post(id, update));
        info!("updated post {}", id);
        json_response(status::Ok, &post)
    }
}

pub struct DeletePostHandler {
    store: Arc<Mutex<PostStore>>,
}

impl DeletePostHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> DeletePostHandler {
        DeletePostHandler { store: store }
    }
}

impl Handler for DeletePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let post_id = get_http_param!(req, "id");

        let id = try_post!(post_id.parse::<u64>().map_err(|_| PostError::InvalidIdFormat));

        try_post!(lock!(self.store).delete_post(id));
        info!("deleted post {}", id);
        let message = format!("Post with id {} has been deleted successfully.", id);
        json_response(status::Ok, &json!({ "message": message }))
    }
}

/// Answers CORS preflight requests.
pub struct PreflightHandler;

impl Handler for PreflightHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let mut res = Response::with(status::Ok);
        res.headers.set(AccessControlAllowMethods(vec![Method::Get,
                                                       Method::Post,
                                                       Method::Put,
                                                       Method::Delete,
                                                       Method::Options]));
        res.headers.set_raw("Access-Control-Allow-Headers", vec![b"Content-Type".to_vec()]);
        Ok(res)
    }
}

pub struct JsonAfterMiddleware;

impl AfterMiddleware for JsonAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        res.headers.set(ContentType::json());
        Ok(res)
    }

    fn catch(&self, _: &mut Request, mut err: IronError) -> IronResult<Response> {
        err.response.headers.set(ContentType::json());
        Err(err)
    }
}

/// Allows cross-origin requests from anywhere.
pub struct CorsAfterMiddleware;

impl AfterMiddleware for CorsAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        res.headers.set(AccessControlAllowOrigin::Any);
        Ok(res)
    }

    fn catch(&self, _: &mut Request, mut err: IronError) -> IronResult<Response> {
        err.response.headers.set(AccessControlAllowOrigin::Any);
        Err(err)
    }
}
