// Single-threaded cooperative loop: one command in flight at a time.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    admin_console::run().await;
}
