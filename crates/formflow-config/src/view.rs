use serde::{Deserialize, Serialize};

/// A presentable section of the entry document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
  /// Role prompt shown to logged-out users.
  Login,
  /// Blank form templates, the employee's landing view.
  Templates,
  /// Submissions awaiting a decision, the supervisor's landing view.
  Pending,
}

/// Section names of each [`View`] inside the entry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewNames {
  pub login: String,
  pub templates: String,
  pub pending: String,
}

impl ViewNames {
  pub fn name(&self, view: View) -> &str {
    match view {
      View::Login => &self.login,
      View::Templates => &self.templates,
      View::Pending => &self.pending,
    }
  }

  /// Reverse lookup of a section name.
  pub fn view(&self, name: &str) -> Option<View> {
    [View::Login, View::Templates, View::Pending]
      .into_iter()
      .find(|v| self.name(*v) == name)
  }
}

impl Default for ViewNames {
  fn default() -> Self {
    Self {
      login: "login".to_string(),
      templates: "form list".to_string(),
      pending: "submission list".to_string(),
    }
  }
}
