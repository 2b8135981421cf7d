#![cfg(target_arch = "wasm32")]

use core::cell::RefCell;
use js_sys::{Promise, Reflect};
use portfolio_dom::{
	config::CONFIG_ELEMENT_ID,
	dom::Dom,
	fetch::{delete_body, FetchService},
	greeting::{show_greeting, GREETINGS},
	service::CommentsService,
	view::CommentListView,
	web::read_config,
	web_dom::WebDom,
	CommentId, Config, Error,
};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Element, HtmlElement, Response, ResponseInit, UrlSearchParams, Window};

wasm_bindgen_test_configure!(run_in_browser);

const COMMENTS: &str = r#"[
	{"id":1,"name":"Ann","date":"2020-01-01","message":"hi"},
	{"id":"2","name":"<b>Bo</b>","date":"2020-01-02","message":"<script>window.pwned = true</script>"}
]"#;

fn init_log() {
	let _ = tracing_wasm::try_set_as_global_default();
}

fn window() -> Window {
	web_sys::window().unwrap()
}

/// Appends a fresh `<div id="{id}">` to the body.
fn container(dom: &WebDom, id: &str) -> Element {
	let container = dom.create_element("div").unwrap();
	dom.set_attribute(&container, "id", id).unwrap();
	dom.document().body().unwrap().append_child(&container).unwrap();
	container
}

fn buttons(container: &Element) -> Vec<HtmlElement> {
	let list = container.query_selector_all("button").unwrap();
	(0..list.length()).map(|i| list.item(i).unwrap().dyn_into().unwrap()).collect()
}

/// Lets pending microtasks run.
async fn next_tick() {
	JsFuture::from(Promise::resolve(&JsValue::UNDEFINED)).await.unwrap();
}

#[derive(Debug, Clone, PartialEq)]
struct Request {
	url: String,
	method: String,
	body: Option<String>,
}

impl Request {
	fn get(url: &str) -> Self {
		Self {
			url: url.to_owned(),
			method: "GET".to_owned(),
			body: None,
		}
	}

	fn post(url: &str, body: &str) -> Self {
		Self {
			url: url.to_owned(),
			method: "POST".to_owned(),
			body: Some(body.to_owned()),
		}
	}
}

/// Stands in for `window.fetch` until dropped, answering every request with the same response.
struct FakeFetch {
	requests: Rc<RefCell<Vec<Request>>>,
	original: JsValue,
	_fetch: Closure<dyn Fn(JsValue, JsValue) -> Promise>,
}

impl FakeFetch {
	fn install(status: u16, body: &'static str) -> Self {
		let original = Reflect::get(&window(), &"fetch".into()).unwrap();
		let requests = Rc::new(RefCell::new(vec![]));
		let fetch = {
			let requests = Rc::clone(&requests);
			Closure::wrap(Box::new(move |url: JsValue, init: JsValue| {
				let mut request = Request::get(&url.as_string().unwrap());
				if !init.is_undefined() {
					if let Some(method) = Reflect::get(&init, &"method".into()).unwrap().as_string() {
						request.method = method
					}
					let sent = Reflect::get(&init, &"body".into()).unwrap();
					if !sent.is_undefined() {
						request.body = Some(sent.unchecked_into::<UrlSearchParams>().to_string().into());
					}
				}
				requests.borrow_mut().push(request);

				let init = ResponseInit::new();
				init.set_status(status);
				Promise::resolve(&Response::new_with_opt_str_and_init(Some(body), &init).unwrap())
			}) as Box<dyn Fn(JsValue, JsValue) -> Promise>)
		};
		Reflect::set(&window(), &"fetch".into(), fetch.as_ref()).unwrap();
		Self {
			requests,
			original,
			_fetch: fetch,
		}
	}

	fn requests(&self) -> Vec<Request> {
		self.requests.borrow().clone()
	}
}

impl Drop for FakeFetch {
	fn drop(&mut self) {
		Reflect::set(&window(), &"fetch".into(), &self.original).unwrap();
	}
}

#[wasm_bindgen_test]
async fn render_and_delete() {
	init_log();

	let fetch = FakeFetch::install(200, COMMENTS);
	let dom = Rc::new(WebDom::current());
	let container = container(&dom, "web-render-and-delete");
	let view = CommentListView::new(Rc::clone(&dom), Rc::new(FetchService::new(window(), &Config::default())), "web-render-and-delete");

	assert_eq!(view.load_comments().await, 2);
	assert_eq!(fetch.requests(), [Request::get("/data")]);
	assert_eq!(container.child_element_count(), 2);
	assert_eq!(dom.listener_count(), 2);

	let rows = container.children();
	let second = rows.item(1).unwrap();
	assert_eq!(second.query_selector_all("b").unwrap().length(), 1);
	assert_eq!(second.query_selector("b").unwrap().unwrap().text_content().unwrap(), "<b>Bo</b>");
	assert_eq!(second.query_selector_all("script").unwrap().length(), 0);

	let first = dom.snapshot(&rows.item(0).unwrap());
	assert_eq!(first.elements_by_tag("b")[0].text_content(), "Ann");
	assert_eq!(first.elements_by_tag("i")[0].text_content(), "2020-01-01");
	assert_eq!(first.elements_by_tag("p")[1].text_content(), "hi");

	buttons(&container)[0].click();
	assert_eq!(fetch.requests(), [Request::get("/data"), Request::post("/delete-data", "id=1")]);
	assert_eq!(container.child_element_count(), 1);
	assert_eq!(dom.listener_count(), 1);

	dom.remove(&container);
	assert_eq!(dom.listener_count(), 0);
}

#[wasm_bindgen_test]
async fn delete_response_is_not_inspected() {
	init_log();

	let dom = Rc::new(WebDom::current());
	let container = container(&dom, "web-delete-response");
	let view = CommentListView::new(Rc::clone(&dom), Rc::new(FetchService::new(window(), &Config::default())), "web-delete-response");
	{
		let _fetch = FakeFetch::install(200, COMMENTS);
		assert_eq!(view.load_comments().await, 2);
	}

	let fetch = FakeFetch::install(500, "not even JSON");
	buttons(&container)[1].click();
	assert_eq!(fetch.requests(), [Request::post("/delete-data", "id=2")]);
	assert_eq!(container.child_element_count(), 1);
	assert_eq!(container.query_selector("b").unwrap().unwrap().text_content().unwrap(), "Ann");

	// The 500 is neither retried nor followed by a reload.
	next_tick().await;
	next_tick().await;
	assert_eq!(fetch.requests().len(), 1);
	assert_eq!(container.child_element_count(), 1);

	dom.remove(&container);
}

#[wasm_bindgen_test]
async fn load_errors() {
	init_log();

	let service = FetchService::new(window(), &Config::default());
	{
		let _fetch = FakeFetch::install(500, "[]");
		match service.fetch_comments().await {
			Err(Error::Status { url, status }) => {
				assert_eq!(url, "/data");
				assert_eq!(status, 500);
			}
			other => panic!("{:?}", other),
		}
	}
	{
		let _fetch = FakeFetch::install(200, "Hello world!");
		assert!(matches!(service.fetch_comments().await, Err(Error::Parse(_))));
	}
	{
		let _fetch = FakeFetch::install(200, r#"[{"name":"no id"}]"#);
		assert!(matches!(service.fetch_comments().await, Err(Error::Parse(_))));
	}
}

#[wasm_bindgen_test]
async fn failed_loads_leave_the_container_alone() {
	init_log();

	for &(status, body) in &[(500_u16, COMMENTS), (404, "[]"), (200, "Hello world!")] {
		let fetch = FakeFetch::install(status, body);
		let dom = Rc::new(WebDom::current());
		let container = container(&dom, "web-failed-load");
		container.set_text_content(Some("Loading…"));
		let view = CommentListView::new(Rc::clone(&dom), Rc::new(FetchService::new(window(), &Config::default())), "web-failed-load");

		assert_eq!(view.load_comments().await, 0, "{} {:?}", status, body);
		assert_eq!(container.inner_html(), "Loading…");
		assert_eq!(fetch.requests(), [Request::get("/data")]);
		assert_eq!(dom.listener_count(), 0);

		dom.remove(&container);
	}
}

#[wasm_bindgen_test]
fn configured_urls_are_used() {
	let config = Config::from_json(r#"{ "comments-url": "/guestbook", "delete-url": "/guestbook/delete" }"#).unwrap();
	let fetch = FakeFetch::install(200, "[]");
	FetchService::new(window(), &config).delete_comment(&CommentId::from("a b&c"));
	assert_eq!(fetch.requests(), [Request::post("/guestbook/delete", "id=a+b%26c")]);
}

#[wasm_bindgen_test]
fn delete_request_body() {
	assert_eq!(String::from(delete_body(&CommentId::from("1")).unwrap().to_string()), "id=1");
	assert_eq!(String::from(delete_body(&CommentId::from("a b&c")).unwrap().to_string()), "id=a+b%26c");
}

#[wasm_bindgen_test]
fn config_from_the_document() {
	let dom = WebDom::current();
	assert_eq!(read_config(dom.document()), Config::default());

	let script = dom.create_element("script").unwrap();
	dom.set_attribute(&script, "type", "application/json").unwrap();
	dom.set_attribute(&script, "id", CONFIG_ELEMENT_ID).unwrap();
	dom.document().body().unwrap().append_child(&script).unwrap();

	script.set_text_content(Some(r#"{ "delete-url": "/guestbook/delete", "delete-label": "Remove" }"#));
	assert_eq!(
		read_config(dom.document()),
		Config {
			delete_url: "/guestbook/delete".to_owned(),
			delete_label: "Remove".to_owned(),
			..Config::default()
		}
	);

	script.set_text_content(Some(r#"{ "delete-url": "#));
	assert_eq!(read_config(dom.document()), Config::default());

	script.set_text_content(Some(r#"{ "colour": "red" }"#));
	assert_eq!(read_config(dom.document()), Config::default());

	dom.remove(&script);
}

#[wasm_bindgen_test]
fn greeting_is_parsed_markup() {
	init_log();

	let dom = WebDom::current();
	let container = container(&dom, "web-greeting");
	container.set_text_content(Some("Loading…"));

	let greeting = show_greeting(&dom, "web-greeting", || 0.3).unwrap();
	assert_eq!(greeting, GREETINGS[1]);

	let snapshot = dom.snapshot(&container);
	let iframes = snapshot.elements_by_tag("iframe");
	assert_eq!(iframes.len(), 1);
	assert_eq!(iframes[0].attribute("src"), Some("https://giphy.com/embed/JwvHIPKRcK4lG"));
	assert_eq!(snapshot.text_content(), "");

	dom.remove(&container);
}

#[wasm_bindgen_test]
fn inner_html_releases_replaced_listeners() {
	let dom = WebDom::current();
	let container = container(&dom, "web-inner-html");
	let button = dom.create_element("button").unwrap();
	dom.on_click(&button, Box::new(|| ())).unwrap();
	dom.append_child(&container, &button).unwrap();
	assert_eq!(dom.listener_count(), 1);

	dom.set_inner_html(&container, "<em>hi</em>");
	assert_eq!(dom.listener_count(), 0);
	assert_eq!(container.inner_html(), "<em>hi</em>");

	dom.remove(&container);
}

#[wasm_bindgen_test]
async fn released_listeners_are_dropped_after_the_click() {
	let dom = Rc::new(WebDom::current());
	let container = container(&dom, "web-retired");
	let button = dom.create_element("button").unwrap();
	{
		let weak = Rc::downgrade(&dom);
		let button_ = button.clone();
		dom.on_click(
			&button,
			Box::new(move || {
				if let Some(dom) = weak.upgrade() {
					dom.remove(&button_)
				}
			}),
		)
		.unwrap();
	}
	dom.append_child(&container, &button).unwrap();

	button.unchecked_ref::<HtmlElement>().click();
	assert_eq!(container.child_element_count(), 0);
	assert_eq!(dom.listener_count(), 0);
	assert_eq!(dom.retired_listener_count(), 1);

	next_tick().await;
	assert_eq!(dom.retired_listener_count(), 0);

	dom.remove(&container);
}

#[wasm_bindgen_test]
fn failed_listener_registration_leaves_no_key() {
	let dom = WebDom::current();
	let button = dom.create_element("button").unwrap();
	let refuse = js_sys::Function::new_no_args("throw new Error('refused')");
	Reflect::set(&button, &"addEventListener".into(), &refuse).unwrap();

	assert!(matches!(dom.on_click(&button, Box::new(|| ())), Err(Error::Dom(_))));
	assert!(!button.has_attribute("data-listener"));
	assert_eq!(dom.listener_count(), 0);

	Reflect::delete_property(button.unchecked_ref(), &"addEventListener".into()).unwrap();
	dom.on_click(&button, Box::new(|| ())).unwrap();
	assert_eq!(dom.listener_count(), 1);
	dom.remove(&button);
	assert_eq!(dom.listener_count(), 0);
}
