use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Result;
use approx::assert_relative_eq;
use serde_derive::Deserialize;

use artifact_filtering::{ContaminationRecord, FilteringArgs, FilteringContext};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Expected {
    threshold: f64,
    #[serde(default)]
    filtered: Vec<bool>,
    #[serde(default)]
    contamination: HashMap<String, f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Testcase {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default)]
    args: Option<FilteringArgs>,
    samples: Vec<String>,
    #[serde(default)]
    normal_samples: HashSet<String>,
    #[serde(default)]
    contamination: HashMap<String, f64>,
    posteriors: Vec<f64>,
    expected: Expected,
}

pub(crate) fn load_testcase(path: impl AsRef<Path>) -> Result<Testcase> {
    let mut reader = File::open(path.as_ref().join("testcase.yaml"))?;
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let mut testcase: Testcase = serde_yaml::from_str(&content)?;
    testcase.path = path.as_ref().to_owned();
    Ok(testcase)
}

impl Testcase {
    pub(crate) fn context(&self) -> Result<FilteringContext> {
        FilteringContext::new(
            self.args.clone().unwrap_or_default(),
            self.normal_samples.clone(),
            &self.samples,
            self.contamination
                .iter()
                .map(|(sample, fraction)| ContaminationRecord::new(sample.clone(), *fraction)),
            vec![],
        )
    }

    pub(crate) fn run(&self) -> Result<()> {
        let context = self.context()?;
        let mut controller = context.threshold_controller();
        let threshold = controller.recompute(&self.posteriors)?;

        assert_relative_eq!(threshold, self.expected.threshold);
        if !self.expected.filtered.is_empty() {
            let filtered: Vec<bool> = self
                .posteriors
                .iter()
                .map(|&p| controller.is_filtered(p))
                .collect();
            assert_eq!(
                filtered, self.expected.filtered,
                "unexpected filter decisions in {}",
                self.path.display()
            );
        }
        for (sample, fraction) in &self.expected.contamination {
            assert_eq!(context.contamination(sample), Some(*fraction));
        }

        Ok(())
    }
}
