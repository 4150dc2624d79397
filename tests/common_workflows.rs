//! Integration tests for common Mandrel workflows through the facade crate.

use mandrel::prelude::*;
use mandrel::Shared;
use std::sync::Arc;

struct GreetController;

#[test]
fn test_prelude_covers_a_full_setup() {
    let mut injector = Injector::new();
    injector
        .register_class(ClassRef::new("GreetController", |_| {
            Ok(Arc::new(GreetController) as Shared)
        }))
        .unwrap();

    let mut router = Router::with_config(
        RouterConfig::new().add_method(HttpMethod::DELETE),
    );
    router.set_injector(Arc::new(injector));
    router.add_group("/api", |scope| {
        scope.add_route(Route::new(
            HttpMethod::GET,
            "/greet/{name}",
            HandlerRef::new("GreetController", "greetAction", |_, request, response, _| {
                let name = request.param("name").unwrap_or("world").to_string();
                Ok(ActionValue::Response(
                    response.with_content(format!("hello {}", name)),
                ))
            }),
        ));
    });

    let mut request = Request::new("GET", "/api/greet/mandrel");
    let response = router.handle(&mut request).unwrap();
    assert_eq!(response.status, HttpStatus::Ok.code());
    assert_eq!(response.body, "hello mandrel");

    let mut request = Request::new("GET", "/api/greet/a/b");
    let err = router.handle(&mut request).unwrap_err();
    assert!(matches!(err, Error::RouteNotFound(_)));
    assert_eq!(err.status_code(), 404);
}
