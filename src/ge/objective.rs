use crate::classifier::maxent::MaxEnt;
use crate::classifier::prior::GaussianPrior;
use crate::data::instance::InstanceList;
use crate::error::{GeError, Result};
use crate::ge::config::GeConfig;
use crate::ge::evaluator::KlGeEvaluator;
use crate::optim::optimizable::Optimizable;

/// MaxEnt trained by the KL GE criterion, optionally plus a Gaussian weight
/// prior, exposed to optimizers as one maximized objective.
///
/// The classifier is owned here so that every parameter write goes through
/// `set_parameters` and bumps the version the evaluator's cache keys on.
pub struct KlGeObjective<'a> {
    classifier: MaxEnt,
    instances: &'a InstanceList,
    evaluator: KlGeEvaluator,
    prior: Option<GaussianPrior>,
}

impl<'a> KlGeObjective<'a> {
    pub fn new(classifier: MaxEnt, instances: &'a InstanceList, evaluator: KlGeEvaluator) -> KlGeObjective<'a> {
        KlGeObjective {
            classifier,
            instances,
            evaluator,
            prior: None,
        }
    }

    pub fn with_prior(mut self, prior: GaussianPrior) -> KlGeObjective<'a> {
        self.prior = Some(prior);
        self
    }

    /// Builds the evaluator from `config` as well.
    pub fn from_config(classifier: MaxEnt, instances: &'a InstanceList, config: GeConfig) -> Result<KlGeObjective<'a>> {
        Ok(KlGeObjective::new(classifier, instances, KlGeEvaluator::new(config)?))
    }

    pub fn classifier(&self) -> &MaxEnt {
        &self.classifier
    }

    pub fn into_classifier(self) -> MaxEnt {
        self.classifier
    }

    pub fn evaluator(&self) -> &KlGeEvaluator {
        &self.evaluator
    }

    fn regularization(&self) -> f64 {
        self.prior
            .map(|p| p.value(&self.classifier.parameters().data))
            .unwrap_or(0.0)
    }
}

impl Optimizable for KlGeObjective<'_> {
    fn num_parameters(&self) -> usize {
        self.classifier.num_parameters()
    }

    fn get_parameters(&self, buffer: &mut [f64]) -> Result<()> {
        self.classifier.get_parameters(buffer)
    }

    fn set_parameters(&mut self, params: &[f64]) -> Result<()> {
        self.classifier.set_parameters(params)
    }

    fn value(&mut self) -> Result<f64> {
        let reg = self.regularization();
        let (ge, _) = self.evaluator.evaluate(&self.classifier, self.instances, reg)?;
        let value = ge + reg;
        log::info!("Value (GE={ge} Gaussian prior={reg}) = {value}");
        Ok(value)
    }

    fn value_gradient(&mut self, buffer: &mut [f64]) -> Result<()> {
        if buffer.len() != self.num_parameters() {
            return Err(GeError::DimensionMismatch {
                what: "gradient buffer",
                expected: self.num_parameters(),
                found: buffer.len(),
            });
        }
        let reg = self.regularization();
        let (_, gradient) = self.evaluator.evaluate(&self.classifier, self.instances, reg)?;
        buffer.copy_from_slice(gradient);
        if let Some(prior) = self.prior {
            prior.add_gradient(&self.classifier.parameters().data, buffer);
        }
        Ok(())
    }
}
