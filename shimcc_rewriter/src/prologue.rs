//! Stand-in declarations for the system headers the rewritten sources expect.
//!
//! The downstream compiler has no libc headers, so every type, stream and function the corpus
//! touches is declared here once and printed ahead of the first rewritten file.

/// A block of declarations that is only emitted when its feature is enabled
struct Section {
    hosted_only: bool,
    text: &'static str,
}

const INTEGER_TYPES: &str = "\
typedef signed char int8_t;
typedef short int16_t;
typedef int int32_t;
typedef long int64_t;

typedef unsigned char uint8_t;
typedef unsigned short uint16_t;
typedef unsigned int uint32_t;
typedef unsigned long uint64_t;

typedef _Bool bool;
typedef __builtin_nuint size_t;
typedef __builtin_va_list va_list;
";

const STREAMS: &str = "\
typedef struct FILE FILE;
extern FILE *stdin;
extern FILE *stdout;
extern FILE *stderr;
";

const BUILTINS: &str = "\
extern void __builtin_trap();

extern void __builtin_va_start(va_list *ap, ...);
extern void *__builtin_va_arg(va_list *ap, ...);
";

const STAT: &str = "\
struct stat {
  char _[512];
};
";

const GLOB: &str = "\
typedef struct {
  size_t gl_pathc;
  char **gl_pathv;
  size_t gl_offs;
  char _[512];
} glob_t;
";

const LIBC: &str = "\
void *malloc(size_t size);
void *calloc(size_t nmemb, size_t size);
void *realloc(void *buf, size_t size);
void free(void *p);
int *__errno_location();
char *strerror(int errnum);
FILE *fopen(char *pathname, char *mode);
FILE *open_memstream(char **ptr, size_t *sizeloc);
long fread(void *ptr, size_t size, size_t nmemb, FILE *fp);
size_t fwrite(void *ptr, size_t size, size_t nmemb, FILE *fp);
int fflush(FILE *fp);
int fclose(FILE *fp);
int fputc(int c, FILE *fp);
int feof(FILE *fp);
static void assert() {}
int strcmp(char *s1, char *s2);
int strncasecmp(char *s1, char *s2, size_t n);
int memcmp(void *s1, void *s2, size_t n);
int printf(char *fmt, ...);
int sprintf(char *buf, char *fmt, ...);
int fprintf(FILE *fp, char *fmt, ...);
int vfprintf(FILE *fp, char *fmt, va_list ap);
size_t strlen(char *p);
int strncmp(char *s1, char *s2, size_t n);
void *memcpy(void *dst, void *src, size_t n);
char *strndup(char *p, size_t n);
char *strdup(char *p);
int isspace(int c);
int ispunct(int c);
int isalpha(int c);
int isdigit(int c);
int isxdigit(int c);
char *strstr(char *haystack, char *needle);
char *strchr(char *s, int c);
double strtod(char *nptr, char **endptr);
static void va_end(va_list ap) {}
unsigned long strtoul(char *nptr, char **endptr, int base);
void exit(int code);
char *strrchr(char *s, int c);
char *strncpy(char *dest, char *src, size_t n);
char *strncat(char *s1, char *s2, size_t n);
";

const HOSTED: &str = "\
int glob(char *pattern, int flags, void *errfn, glob_t *pglob);
void globfree(glob_t *pglob);
char *dirname(char *path);
char *basename(char *path);
int unlink(char *pathname);
int mkstemp(char *template);
int close(int fd);
typedef int pid_t;
int posix_spawnp(pid_t *pid,
  const char *path,
  const void *file_actions,
  const void *attrp,
  char *const argv[],
  char *const envp[]);
pid_t waitpid(pid_t pid, int *stat_loc, int options);
int atexit(void (*)(void));
char *getenv(const char *name);
static int WIFEXITED(int status) { return status & 0x80; }
static int WIFSIGNALED(int status) { return 0; }
int stat(char *pathname, struct stat *statbuf);
";

// order matters: every type has to be declared before the first prototype using it
const SECTIONS: [Section; 7] = [
    Section { hosted_only: false, text: INTEGER_TYPES },
    Section { hosted_only: false, text: STREAMS },
    Section { hosted_only: false, text: BUILTINS },
    Section { hosted_only: false, text: STAT },
    Section { hosted_only: true, text: GLOB },
    Section { hosted_only: false, text: LIBC },
    Section { hosted_only: true, text: HOSTED },
];

/// The synthesized header replacement printed once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prologue {
    // also declare globbing, path, process and environment functions
    hosted: bool,
}

impl Prologue {
    /// Prologue with the full hosted feature set
    pub fn hosted() -> Self {
        Prologue { hosted: true }
    }
    /// Prologue restricted to memory, string, char-class and stdio declarations
    pub fn minimal() -> Self {
        Prologue { hosted: false }
    }
    pub fn is_hosted(&self) -> bool {
        self.hosted
    }

    /// Renders the declarations. The result only depends on the selected feature set.
    pub fn render(&self) -> String {
        SECTIONS
            .iter()
            .filter(|section| self.hosted || !section.hosted_only)
            .map(|section| section.text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether `symbol` is declared (as a type, variable or function) by this prologue
    pub fn declares(&self, symbol: &str) -> bool {
        let rendered = self.render();
        let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';

        rendered.match_indices(symbol).any(|(start, _)| {
            let end = start + symbol.len();
            let before = rendered[..start].chars().next_back();
            let after = rendered[end..].chars().next();

            !before.is_some_and(is_ident) && matches!(after, Some('(' | ';' | ' ' | ','))
        })
    }
}

impl Default for Prologue {
    fn default() -> Self {
        Prologue::hosted()
    }
}
