use ge_maxent::{
    ConstraintSet, FeatureVector, GeConfig, GradientAscent, Instance, InstanceList, KlGeObjective, LabelScorer,
    MaxEnt,
};

fn main() -> ge_maxent::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::WARN)
        .init();

    let mut instances = InstanceList::new(4, 2);
    for (i, features) in [vec![0], vec![1], vec![0, 2], vec![3], vec![1, 3], vec![2]].into_iter().enumerate() {
        instances.push(Instance::unlabeled(format!("doc{i}"), FeatureVector::binary(features)?))?;
    }

    let model = MaxEnt::for_instances(&instances);
    let default = model.default_feature_index();
    let config = GeConfig::new(ConstraintSet::new().with(default, vec![0.9, 0.1]), default);

    let mut objective = KlGeObjective::from_config(model, &instances, config)?;
    let optimizer = GradientAscent::new(0.5);
    let epochs = 200;

    for epoch in 0..epochs {
        let value = optimizer.step(&mut objective)?;
        if epoch % 20 == 0 {
            println!("Epoch {epoch}: GE value = {value:.6}");
        }
    }

    let marginal = objective.classifier().mean_distribution(&instances, 1.0);
    println!("Label marginal: [{:.4}, {:.4}]", marginal[0], marginal[1]);
    Ok(())
}
