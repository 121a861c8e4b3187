use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};
use std::ffi::{CStr, CString};
use std::fmt;
use thiserror::Error;

/// Size of the buffer driver logs are read into, including the NUL terminator.
pub const INFO_LOG_CAPACITY: usize = 512;

const EMPTY_LOG: &str = "<driver reported no diagnostic output>";

/// Source text for a vertex and fragment stage pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderAsset<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(&self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildStep {
    Compile(ShaderStage),
    Link,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::Compile(stage) => write!(f, "compilation of {stage} stage"),
            BuildStep::Link => write!(f, "program linking"),
        }
    }
}

/// Driver log of a failed build step, at most `INFO_LOG_CAPACITY - 1` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub step: BuildStep,
    pub log: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed:\n{}", self.step, self.log)
    }
}

///
/// Result of a build that hands out its handle even when the driver
/// rejected the sources.
///
#[derive(Debug)]
pub enum BuildOutcome<T> {
    Success(T),
    Failure(T, Vec<Diagnostic>),
}

impl<T> BuildOutcome<T> {
    fn from_parts(handle: T, diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            BuildOutcome::Success(handle)
        } else {
            BuildOutcome::Failure(handle, diagnostics)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success(_))
    }

    pub fn handle(&self) -> &T {
        match self {
            BuildOutcome::Success(h) | BuildOutcome::Failure(h, _) => h,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            BuildOutcome::Success(_) => &[],
            BuildOutcome::Failure(_, d) => d,
        }
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        match self {
            BuildOutcome::Success(h) => (h, Vec::new()),
            BuildOutcome::Failure(h, d) => (h, d),
        }
    }

    /// Treats any diagnostic as fatal, releasing the handle.
    pub fn into_result(self) -> Result<T, PBError> {
        match self {
            BuildOutcome::Success(h) => Ok(h),
            BuildOutcome::Failure(_, d) => Err(PBError::Build(d)),
        }
    }
}

pub struct ProgramBuilder<'a> {
    asset: ShaderAsset<'a>,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(asset: ShaderAsset<'a>) -> Self {
        Self { asset }
    }

    pub fn build(self) -> Result<BuildOutcome<Program>, PBError> {
        let vert_src = CString::new(self.asset.vertex)
            .map_err(|_| PBError::InvalidSource(ShaderStage::Vertex))?;
        let frag_src = CString::new(self.asset.fragment)
            .map_err(|_| PBError::InvalidSource(ShaderStage::Fragment))?;

        let (vert, mut diagnostics) = Shader::compile(ShaderStage::Vertex, &vert_src).into_parts();
        let (frag, mut frag_diagnostics) =
            Shader::compile(ShaderStage::Fragment, &frag_src).into_parts();
        diagnostics.append(&mut frag_diagnostics);

        let program = Program {
            id: unsafe { gl::CreateProgram() },
        };
        let mut success: GLint = 0;

        unsafe {
            gl::AttachShader(program.id, vert.id);
            gl::AttachShader(program.id, frag.id);
            gl::LinkProgram(program.id);
            gl::GetProgramiv(program.id, gl::LINK_STATUS, (&mut success) as *mut GLint);
        }

        if success != gl::TRUE as GLint {
            diagnostics.push(Diagnostic {
                step: BuildStep::Link,
                log: read_info_log(program.id, gl::GetProgramInfoLog),
            });
        }

        // stages are only flagged for deletion while still attached
        drop(vert);
        drop(frag);

        log::debug!(
            "built program {} with {} diagnostics",
            program.id,
            diagnostics.len()
        );

        Ok(BuildOutcome::from_parts(program, diagnostics))
    }
}

struct Shader {
    id: GLuint,
}

impl Shader {
    fn compile(stage: ShaderStage, src: &CStr) -> BuildOutcome<Shader> {
        let mut success: GLint = 0;

        let shader = Shader {
            id: unsafe { gl::CreateShader(stage.gl_kind()) },
        };

        unsafe {
            gl::ShaderSource(
                shader.id,
                1,
                (&src.as_ptr()) as *const *const GLchar,
                std::ptr::null(),
            );
            gl::CompileShader(shader.id);
            gl::GetShaderiv(shader.id, gl::COMPILE_STATUS, (&mut success) as *mut GLint);
        }

        let mut diagnostics = Vec::new();
        if success != gl::TRUE as GLint {
            diagnostics.push(Diagnostic {
                step: BuildStep::Compile(stage),
                log: read_info_log(shader.id, gl::GetShaderInfoLog),
            });
        }

        BuildOutcome::from_parts(shader, diagnostics)
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) }
    }
}

type InfoLogFn = unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar);

fn read_info_log(id: GLuint, getter: InfoLogFn) -> String {
    let mut buf = [0_u8; INFO_LOG_CAPACITY];

    unsafe {
        getter(
            id,
            INFO_LOG_CAPACITY as GLsizei,
            std::ptr::null_mut(),
            buf.as_mut_ptr() as *mut GLchar,
        );
    }

    log_from_buffer(&buf)
}

fn log_from_buffer(buf: &[u8]) -> String {
    let limit = buf.len().min(INFO_LOG_CAPACITY - 1);
    let data = buf[..limit].split(|b| *b == 0).next().unwrap_or_default();

    let text = String::from_utf8_lossy(data);
    let text = text.trim_end();

    if text.is_empty() {
        EMPTY_LOG.to_string()
    } else {
        text.to_string()
    }
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{0} shader source contains a NUL byte")]
    InvalidSource(ShaderStage),
    #[error("{}", join_diagnostics(.0))]
    Build(Vec<Diagnostic>),
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_stops_at_nul() {
        let mut buf = [0_u8; INFO_LOG_CAPACITY];
        buf[..11].copy_from_slice(b"0:1: error\n");
        buf[20] = b'x';

        assert_eq!(log_from_buffer(&buf), "0:1: error");
    }

    #[test]
    fn log_is_capped() {
        let buf = [b'e'; INFO_LOG_CAPACITY + 100];

        assert_eq!(log_from_buffer(&buf).len(), INFO_LOG_CAPACITY - 1);
    }

    #[test]
    fn empty_log_is_never_blank() {
        let buf = [0_u8; INFO_LOG_CAPACITY];

        assert_eq!(log_from_buffer(&buf), EMPTY_LOG);
    }

    #[test]
    fn failure_keeps_handle() {
        let diagnostic = Diagnostic {
            step: BuildStep::Compile(ShaderStage::Fragment),
            log: "syntax error".to_string(),
        };
        let outcome = BuildOutcome::from_parts(7_u32, vec![diagnostic.clone()]);

        assert!(!outcome.is_success());
        assert_eq!(*outcome.handle(), 7);
        assert_eq!(outcome.diagnostics(), &[diagnostic]);

        let (handle, diagnostics) = outcome.into_parts();
        assert_eq!(handle, 7);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn strict_outcome_reports_every_step() {
        let outcome = BuildOutcome::from_parts(
            1_u32,
            vec![
                Diagnostic {
                    step: BuildStep::Compile(ShaderStage::Vertex),
                    log: "bad vertex".to_string(),
                },
                Diagnostic {
                    step: BuildStep::Link,
                    log: "bad link".to_string(),
                },
            ],
        );

        let err = outcome.into_result().unwrap_err().to_string();
        assert!(err.contains("compilation of vertex stage failed:\nbad vertex"));
        assert!(err.contains("program linking failed:\nbad link"));
    }

    #[test]
    fn success_has_no_diagnostics() {
        let outcome = BuildOutcome::from_parts(3_u32, Vec::new());

        assert!(outcome.is_success());
        assert!(outcome.diagnostics().is_empty());
        assert_eq!(outcome.into_result().unwrap(), 3);
    }

    #[test]
    fn nul_in_source_is_rejected_before_gl() {
        let res = ProgramBuilder::new(ShaderAsset {
            vertex: "void main() {}",
            fragment: "void\0main() {}",
        })
        .build();

        assert!(matches!(
            res,
            Err(PBError::InvalidSource(ShaderStage::Fragment))
        ));
    }
}
