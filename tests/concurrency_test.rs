use hostjar::cookies::jar::CookieJar;
use hostjar::cookies::record::CookieRecord;
use hostjar::cookies::storage::CookieStorage;
use hostjar::http::{interceptors, PendingRequest, ReceivedResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

#[test]
fn test_concurrent_distinct_keys_all_survive() {
    let jar = Arc::new(CookieJar::default());
    let threads = 8;
    let per_thread = 200;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let jar = Arc::clone(&jar);
            thread::spawn(move || {
                for i in 0..per_thread {
                    let host = format!("host{}.example.com", i % 4);
                    jar.set(&host, CookieRecord::new(format!("t{t}-c{i}"), i.to_string()))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(jar.storage().len(), threads * per_thread);
    for t in 0..threads {
        for i in 0..per_thread {
            let host = format!("host{}.example.com", i % 4);
            let cookie = jar.get_cookie(&host, &format!("t{t}-c{i}")).unwrap();
            assert_eq!(cookie.map(|c| c.value), Some(i.to_string()));
        }
    }
}

#[test]
fn test_concurrent_same_key_leaves_one_consistent_record() {
    let jar = Arc::new(CookieJar::default());
    let writers = 16;

    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let jar = Arc::clone(&jar);
            thread::spawn(move || {
                for round in 0..100 {
                    // Every field encodes the writer, so a torn record is detectable.
                    let tag = format!("w{w}");
                    let cookie = CookieRecord::new("sid", format!("{tag}-{round}"))
                        .with_path(format!("/{tag}"))
                        .with_domain(format!("{tag}.example.com"));
                    jar.set("example.com", cookie).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let cookies = jar.get("example.com").unwrap();
    assert_eq!(cookies.len(), 1);

    let cookie = &cookies["sid"];
    let tag = cookie.value.split('-').next().unwrap();
    assert_eq!(cookie.path, format!("/{tag}"));
    assert_eq!(cookie.domain.as_deref(), Some(format!("{tag}.example.com").as_str()));
}

#[test]
fn test_expiring_reads_never_drop_a_fresh_write() {
    let jar = Arc::new(CookieJar::default());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..6)
        .map(|_| {
            let jar = Arc::clone(&jar);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let _ = jar.get_cookie("h.com", "a").unwrap();
                }
            })
        })
        .collect();

    let mut lost = 0;
    for round in 0..500 {
        let short = OffsetDateTime::now_utc() + time::Duration::microseconds(200);
        jar.set("h.com", CookieRecord::new("a", "short").with_expires(short))
            .unwrap();
        thread::sleep(Duration::from_micros(300));

        let fresh = round.to_string();
        jar.set("h.com", CookieRecord::new("a", fresh.clone())).unwrap();
        if jar.get_cookie("h.com", "a").unwrap().map(|c| c.value) != Some(fresh) {
            lost += 1;
        }
    }

    done.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(lost, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hooks_under_concurrent_traffic() {
    let jar = Arc::new(CookieJar::default());
    let (on_request, on_response) = interceptors(Arc::clone(&jar));

    let mut tasks = Vec::new();
    for i in 0..64 {
        let on_request = on_request.clone();
        let on_response = on_response.clone();
        tasks.push(tokio::spawn(async move {
            let host = format!("site{}.example.com", i % 8);
            on_response
                .intercept(&ReceivedResponse::new(
                    host.clone(),
                    vec![CookieRecord::new(format!("c{i}"), "v")],
                ))
                .unwrap();

            let mut request = PendingRequest::new(&format!("https://{host}/")).unwrap();
            on_request.intercept(&mut request).unwrap();

            // Our own cookie was written before the request was built.
            let header = request.headers().get("Cookie").unwrap().to_str().unwrap().to_string();
            assert!(header.split("; ").any(|pair| pair == format!("c{i}=v")));
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(jar.storage().len(), 64);
}
