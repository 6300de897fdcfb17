use std::collections::HashSet;
use std::sync::LazyLock;

/// Embedded English stoplist, one word per line.
const ENGLISH: &str = "
a
about
above
after
again
against
all
am
an
and
any
are
as
at
be
because
been
before
being
below
between
both
but
by
can
could
did
do
does
doing
down
during
each
few
for
from
further
had
has
have
having
he
her
here
hers
herself
him
himself
his
how
i
if
in
into
is
it
its
itself
just
me
more
most
my
myself
no
nor
not
now
of
off
on
once
only
or
other
our
ours
ourselves
out
over
own
same
she
should
so
some
such
than
that
the
their
theirs
them
themselves
then
there
these
they
this
those
through
to
too
under
until
up
very
was
we
were
what
when
where
which
while
who
whom
why
will
with
would
you
your
yours
yourself
yourselves
";

/// Chinese function words and particles. Matched as substrings, not tokens:
/// Chinese text has no whitespace word boundaries.
pub const CHINESE_HINTS: &[&str] = &[
    "的", "了", "是", "在", "和", "我", "你", "他", "她", "它", "我们", "他们", "这", "那",
    "一个", "就", "也", "都", "而", "与", "及", "着", "但", "把", "被", "没有", "不",
];

static ENGLISH_STOPLIST: LazyLock<HashSet<String>> = LazyLock::new(|| parse_stoplist(ENGLISH));

/// Parse a stoplist: one word per line, lowercased, blank lines skipped.
fn parse_stoplist(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect()
}

/// The English stoplist.
pub fn english_stoplist() -> &'static HashSet<String> {
    &ENGLISH_STOPLIST
}

/// Latin-script word tokens (ASCII letters plus inner apostrophes).
pub(crate) fn latin_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphabetic() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
}

/// Fraction of Latin tokens found in the English stoplist (ASCII case fold).
pub fn english_stopword_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut hits = 0usize;
    for word in latin_words(text) {
        total += 1;
        if ENGLISH_STOPLIST.contains(&word.to_ascii_lowercase()) {
            hits += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Summed substring occurrences of [`CHINESE_HINTS`] divided by character length.
///
/// Overlapping hints are counted independently ("我们" also counts "我").
pub fn chinese_hint_ratio(text: &str) -> f64 {
    let length = text.chars().count();
    if length == 0 {
        return 0.0;
    }
    let hits: usize = CHINESE_HINTS
        .iter()
        .map(|hint| text.matches(hint).count())
        .sum();
    hits as f64 / length as f64
}

/// Max of the English and Chinese stopword measurements.
pub fn stopword_density(text: &str) -> f64 {
    english_stopword_ratio(text).max(chinese_hint_ratio(text))
}
