// tests/support/server.rs

//! Minimal HTTP test server: one handler closure per server, each
//! connection served on a background runtime thread.

use std::convert::Infallible;
use std::future::Future;
use std::net;
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::runtime;
use tokio::sync::oneshot;

pub struct Server {
    addr: net::SocketAddr,
    panic_rx: std_mpsc::Receiver<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl Server {
    pub fn addr(&self) -> net::SocketAddr {
        self.addr
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if !thread::panicking() {
            self.panic_rx
                .recv_timeout(Duration::from_secs(3))
                .expect("test server should not panic");
        }
    }
}

pub fn http<F, Fut>(func: F) -> Server
where
    F: Fn(http::Request<hyper::body::Incoming>) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = http::Response<Full<Bytes>>> + Send + 'static,
{
    let (addr_tx, addr_rx) = std_mpsc::channel();
    let (panic_tx, panic_rx) = std_mpsc::channel();
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    thread::Builder::new()
        .name("test-server".into())
        .spawn(move || {
            let rt = runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("new runtime");
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind");
                addr_tx
                    .send(listener.local_addr().expect("local addr"))
                    .expect("send addr");

                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        accepted = listener.accept() => {
                            let (io, _) = accepted.expect("accept");
                            let func = func.clone();
                            tokio::spawn(async move {
                                let _ = hyper::server::conn::http1::Builder::new()
                                    .serve_connection(
                                        TokioIo::new(io),
                                        service_fn(move |req| {
                                            let func = func.clone();
                                            async move {
                                                Ok::<_, Infallible>(func(req).await)
                                            }
                                        }),
                                    )
                                    .await;
                            });
                        }
                    }
                }
            });
            let _ = panic_tx.send(());
        })
        .expect("server thread");

    let addr = addr_rx.recv().expect("server address");

    Server {
        addr,
        panic_rx,
        shutdown_tx: Some(shutdown_tx),
    }
}
