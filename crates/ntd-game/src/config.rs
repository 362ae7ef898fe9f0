use derive_builder::Builder;

/// Game configuration.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct GameConfig {
    /// Minimum number of dice in a game.
    #[builder(default = "3")]
    min_dice: usize,
    /// Minimum number of faces per die.
    #[builder(default = "2")]
    min_faces: usize,
    /// Digits after the decimal point in the help table.
    #[builder(default = "1")]
    percent_precision: usize,
}

impl GameConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if matches!(self.min_dice, Some(n) if n < 2) {
            return Err("a game needs at least 2 dice".to_string());
        }

        if matches!(self.min_faces, Some(0)) {
            return Err("a die needs at least 1 face".to_string());
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_dice: 3,
            min_faces: 2,
            percent_precision: 1,
        }
    }
}

impl GameConfig {
    /// Creates a new builder for GameConfig.
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    /// Minimum number of dice in a game.
    pub fn min_dice(&self) -> usize {
        self.min_dice
    }

    /// Minimum number of faces per die.
    pub fn min_faces(&self) -> usize {
        self.min_faces
    }

    /// Digits after the decimal point in the help table.
    pub fn percent_precision(&self) -> usize {
        self.percent_precision
    }
}
