use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentEnvironment {
    Local,
    Dev,
    Staging,
    Prod,
}

impl fmt::Display for DeploymentEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentEnvironment::Local => "local",
            DeploymentEnvironment::Dev => "dev",
            DeploymentEnvironment::Staging => "staging",
            DeploymentEnvironment::Prod => "prod",
        };
        f.write_str(s)
    }
}
