use tsgroup::{DataTypeKey, GroupDefinition, MemberType, TsId};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    // Instantaneous stage at every AB* site, any sub-location
    let rules = GroupDefinition::new("AB Stage")
        .with_member(MemberType::BaseLocation, "AB*")
        .with_data_type(DataTypeKey(44), "Stage")
        .with_member(MemberType::ParamType, "Inst")
        .compile();

    println!("{rules}");

    for path in [
        "ABC.Stage.Inst.1Hour.0.raw",
        "ABQ-Pool.stage.Inst.15Minutes.0.rev",
        "XYZ-ABC.Stage.Inst.1Hour.0.raw",
        "ABC.Stage.Ave.1Day.1Day.raw",
        "ABC",
    ] {
        let report = rules.matches_detailed(&TsId::from_path(path));
        println!("{path}: {report}");
    }
}
