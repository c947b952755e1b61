use serde::{Serialize, Deserialize};

use crate::data::feature_vector::FeatureVector;
use crate::error::{GeError, Result};

/// One training example.
///
/// An instance with `target == None` is unlabeled; only unlabeled instances
/// take part in the GE criterion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub features: FeatureVector,
    #[serde(default)]
    pub target: Option<usize>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Instance {
    pub fn unlabeled(name: impl Into<String>, features: FeatureVector) -> Instance {
        Instance {
            name: name.into(),
            features,
            target: None,
            weight: 1.0,
        }
    }

    pub fn labeled(name: impl Into<String>, features: FeatureVector, target: usize) -> Instance {
        Instance {
            name: name.into(),
            features,
            target: Some(target),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Instance {
        self.weight = weight;
        self
    }

    pub fn is_labeled(&self) -> bool {
        self.target.is_some()
    }
}

/// Training set with fixed data (feature) and target (label) alphabet sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceList {
    num_features: usize,
    num_labels: usize,
    instances: Vec<Instance>,
}

impl InstanceList {
    pub fn new(num_features: usize, num_labels: usize) -> InstanceList {
        InstanceList {
            num_features,
            num_labels,
            instances: Vec::new(),
        }
    }

    /// Appends an instance after checking it against the alphabets.
    pub fn push(&mut self, instance: Instance) -> Result<()> {
        self.check(&instance)?;
        self.instances.push(instance);
        Ok(())
    }

    fn check(&self, instance: &Instance) -> Result<()> {
        if !instance.weight.is_finite() || instance.weight < 0.0 {
            return Err(GeError::InvalidWeight(instance.weight));
        }
        if let Some(index) = instance.features.max_index() {
            if index >= self.num_features {
                return Err(GeError::FeatureOutOfRange {
                    index,
                    num_features: self.num_features,
                });
            }
        }
        if let Some(label) = instance.target {
            if label >= self.num_labels {
                return Err(GeError::LabelOutOfRange {
                    label,
                    num_labels: self.num_labels,
                });
            }
        }
        Ok(())
    }

    /// Size of the data alphabet, not counting the default feature.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, i: usize) -> &Instance {
        &self.instances[i]
    }

    pub fn get_mut(&mut self, i: usize) -> &mut Instance {
        &mut self.instances[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instance> {
        self.instances.iter()
    }

    /// Unlabeled instances with their position in the list.
    pub fn unlabeled(&self) -> impl Iterator<Item = (usize, &Instance)> + '_ {
        self.instances.iter().enumerate().filter(|(_, inst)| !inst.is_labeled())
    }

    /// Serializes the training set to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a training set and re-validates every instance.
    pub fn load_json(path: &str) -> Result<InstanceList> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let list: InstanceList = serde_json::from_reader(reader)?;
        for instance in &list.instances {
            list.check(instance)?;
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> InstanceList {
        let mut list = InstanceList::new(3, 2);
        list.push(Instance::unlabeled("a", FeatureVector::binary(vec![0]).unwrap())).unwrap();
        list.push(Instance::labeled("b", FeatureVector::binary(vec![1]).unwrap(), 1)).unwrap();
        list.push(Instance::unlabeled("c", FeatureVector::binary(vec![2]).unwrap())).unwrap();
        list
    }

    #[test]
    fn unlabeled_skips_labeled_instances() {
        let names: Vec<_> = list().unlabeled().map(|(i, inst)| (i, inst.name.clone())).collect();
        assert_eq!(names, vec![(0, "a".to_string()), (2, "c".to_string())]);
    }

    #[test]
    fn push_rejects_out_of_range_feature() {
        let mut l = list();
        let err = l
            .push(Instance::unlabeled("d", FeatureVector::binary(vec![3]).unwrap()))
            .unwrap_err();
        assert!(matches!(err, GeError::FeatureOutOfRange { index: 3, num_features: 3 }));
    }

    #[test]
    fn push_rejects_negative_weight() {
        let mut l = list();
        let inst = Instance::unlabeled("d", FeatureVector::default()).with_weight(-1.0);
        assert!(matches!(l.push(inst), Err(GeError::InvalidWeight(_))));
    }

    #[test]
    fn json_round_trip_preserves_targets() {
        let path = std::env::temp_dir().join("ge_maxent_instances_test.json");
        let path = path.to_str().unwrap();
        list().save_json(path).unwrap();
        let loaded = InstanceList::load_json(path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.get(1).target, Some(1));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn load_rejects_repeated_feature_index() {
        let path = std::env::temp_dir().join("ge_maxent_duplicate_feature_test.json");
        let json = r#"{"num_features":2,"num_labels":2,"instances":[{"name":"a","features":[[0,1.0],[0,1.0]]}]}"#;
        std::fs::write(&path, json).unwrap();
        let loaded = InstanceList::load_json(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert!(matches!(loaded, Err(GeError::Json(_))));
    }
}
