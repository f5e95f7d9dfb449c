use iron::prelude::Chain;
use router::Router;

use handlers::*;
use store::PostStore;

/// Mount every post endpoint over `store` and wrap the router with the
/// JSON and CORS response middleware.
pub fn chain(store: PostStore) -> Chain {
    let handlers = Handlers::new(store);

    let mut router = Router::new();
    router.get("/api/posts", handlers.list, "list_posts");
    router.post("/api/posts", handlers.create, "create_post");
    router.get("/api/posts/search", handlers.search, "search_posts");
    router.put("/api/posts/:id", handlers.update, "update_post");
    router.delete("/api/posts/:id", handlers.delete, "delete_post");

    router.options("/api/posts", PreflightHandler, "posts_preflight");
    router.options("/api/posts/search", PreflightHandler, "search_preflight");
    router.options("/api/posts/:id", PreflightHandler, "post_preflight");

    let mut chain = Chain::new(router);
    chain.link_after(JsonAfterMiddleware);
    chain.link_after(CorsAfterMiddleware);
    chain
}
