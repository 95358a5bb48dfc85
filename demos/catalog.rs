use tsgroup::{GroupCatalog, TsId};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let catalog = GroupCatalog::from_file("demos/groups.tsg")
        .expect("failed to load groups")
        .compile()
        .expect("invalid group catalog");

    println!("{catalog}");
    println!("evaluation order: {}", catalog.evaluation_order().join(" -> "));

    let ids: Vec<TsId> = [
        "ABC.Stage.Inst.1Hour.0.raw",
        "ABC-Pool.Elev.Inst.1Hour.0.raw",
        "OLDMILL.Stage.Inst.1Hour.0.raw",
        "ABC.Stage.Inst.1Day.0.raw",
        "KEYS.Flow.Inst.1Hour.0.raw",
        "KEYS.Flow.Ave.1Hour.1Hour.raw",
    ]
    .into_iter()
    .map(TsId::from_path)
    .collect();

    for name in catalog.evaluation_order() {
        let members = catalog.expand(name, &ids).unwrap_or_default();
        println!("{name}: {} of {} identifiers", members.len(), ids.len());
        for id in members {
            println!("    {id}");
        }
    }

    for id in &ids {
        println!("{id} belongs to: {:?}", catalog.groups_containing(id));
    }

    if let Some(parents) = catalog.dependents_of("Retired") {
        println!("re-evaluate after editing \"Retired\": {parents:?}");
    }
}
