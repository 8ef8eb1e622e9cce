use hostjar::cookies::jar::CookieJar;
use hostjar::cookies::record::CookieRecord;
use hostjar::http::orderedheaders::OrderedHeaderMap;
use hostjar::http::{PendingRequest, RequestInterceptor};
use std::sync::Arc;

#[test]
fn test_cookie_header_keeps_its_slot() {
    let jar = Arc::new(CookieJar::default());
    jar.set("example.com", CookieRecord::new("a", "1")).unwrap();
    let hook = RequestInterceptor::new(Arc::clone(&jar));

    let mut request = PendingRequest::new("https://example.com/").unwrap();
    request.headers_mut().insert("Host", "example.com").unwrap();
    request.headers_mut().insert("Cookie", "stale=1").unwrap();
    request.headers_mut().insert("Accept", "*/*").unwrap();

    hook.intercept(&mut request).unwrap();

    let header_map = request.into_headers().to_header_map();
    let mut iter = header_map.iter();

    assert_eq!(iter.next().unwrap().0, "host");
    let cookie = iter.next().unwrap();
    assert_eq!(cookie.0, "cookie");
    assert_eq!(cookie.1, "a=1");
    assert_eq!(iter.next().unwrap().0, "accept");
}

#[test]
fn test_ordered_headers_update_preserves_order() {
    let mut map = OrderedHeaderMap::new();

    map.insert("A", "1").unwrap();
    map.insert("B", "2").unwrap();
    map.insert("C", "3").unwrap();
    map.insert("B", "22").unwrap();

    let names: Vec<_> = map.iter().map(|(n, v)| format!("{}={}", n, v.to_str().unwrap())).collect();
    assert_eq!(names, vec!["a=1", "b=22", "c=3"]);
}
