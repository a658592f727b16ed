//! pcs-admin binary entry point

fn main() -> anyhow::Result<()> {
    pcs_admin::run()
}
