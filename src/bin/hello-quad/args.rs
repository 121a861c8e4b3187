use clap::Parser;

use gl_wrapper::renderer::PolygonMode;

#[derive(Debug, Parser)]
pub struct Args {
    /// Abort when the shader program fails to compile or link
    #[arg(long)]
    pub strict: bool,
    /// Draw triangle outlines only
    #[arg(long)]
    pub wireframe: bool,
    /// Close the window after this many frames
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub frames: Option<u64>,
}

impl Args {
    pub fn polygon_mode(&self) -> PolygonMode {
        if self.wireframe {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_program() {
        let args = Args::try_parse_from(["hello-quad"]).unwrap();

        assert!(!args.strict);
        assert_eq!(args.frames, None);
        assert_eq!(args.polygon_mode(), PolygonMode::Fill);
    }

    #[test]
    fn flags_parse() {
        let args =
            Args::try_parse_from(["hello-quad", "--strict", "--wireframe", "--frames", "10"])
                .unwrap();

        assert!(args.strict);
        assert_eq!(args.frames, Some(10));
        assert_eq!(args.polygon_mode(), PolygonMode::Line);
    }

    #[test]
    fn zero_frame_limit_is_rejected() {
        assert!(Args::try_parse_from(["hello-quad", "--frames", "0"]).is_err());
    }
}
