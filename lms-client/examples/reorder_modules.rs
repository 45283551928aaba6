//! Reorder the modules of a course from the command line.
//!
//! ```text
//! LMS_API_URL=http://localhost:8080/api LMS_API_TOKEN=... \
//!     cargo run --example reorder_modules -- <course_id> <moved_module_id> <target_module_id>
//! ```

use anyhow::{Context, bail};
use lms_client::{ClientConfig, CollectionRef, CourseModule, ReorderOutcome, ReorderSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();
    lms_client::logger::init_logger_with_file(Some("debug"), None);

    let args: Vec<i64> = std::env::args()
        .skip(1)
        .map(|a| a.parse::<i64>().with_context(|| format!("not an id: {a}")))
        .collect::<anyhow::Result<_>>()?;
    let &[course_id, moved, target] = args.as_slice() else {
        bail!("usage: reorder_modules <course_id> <moved_module_id> <target_module_id>");
    };

    let config = ClientConfig::from_env()?;
    let gateway = config.build_gateway()?;
    let session: ReorderSession<CourseModule, _> =
        ReorderSession::open(gateway, CollectionRef::course_modules(course_id)).await?;

    print_order("before", &session);

    session.begin_drag(moved)?;
    match session.drop_on(target).await? {
        ReorderOutcome::Settled => println!("saved"),
        ReorderOutcome::Unchanged => println!("nothing to do"),
        ReorderOutcome::Ignored(e) => println!("ignored: {e}"),
        failed @ (ReorderOutcome::RolledBack(_) | ReorderOutcome::Overtaken(_)) => {
            if let (Some(msg), Some(e)) = (failed.user_message(), failed.sync_error()) {
                println!("{msg} ({e})");
            }
        }
        other => println!("{other:?}"),
    }

    print_order("after", &session);
    session.close();
    Ok(())
}

fn print_order<G>(label: &str, session: &ReorderSession<CourseModule, G>)
where
    G: lms_client::SyncGateway<CourseModule> + 'static,
{
    println!("{label}:");
    for item in session.items() {
        println!("  {:>2}. [{}] {}", item.position + 1, item.id, item.payload.title);
    }
}
