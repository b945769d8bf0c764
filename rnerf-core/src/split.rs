use std::fmt;
use std::str::FromStr;

/// Which part of the dataset to load.
///
/// `All` concatenates every manifest found in the root directory, which is
/// what instant-ngp style trainers feed on. `TrainVal` is train followed by
/// val.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Val,
    Test,
    TrainVal,
    All,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
            Split::TrainVal => "trainval",
            Split::All => "all",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            "trainval" => Ok(Split::TrainVal),
            "all" => Ok(Split::All),
            other => Err(format!("unknown split: {other}")),
        }
    }
}
