/*!
# The MSIPL Language

An MSIPL script is a list of lines. Each line holds one instruction.
Leading and trailing spaces and tabs are ignored, interior spacing is
not. Empty lines and lines starting with `#` are comments.

A processor runs a few instructions every frame, then yields. How many
is set by `instructions_per_tick`. A loop that never ends still only
gets its share of each frame. The first run-time error halts the
processor for good; so does any compile error, before anything runs.

## Types

| word    | holds                                       |
|---------|---------------------------------------------|
| `int`   | 64-bit signed integer                       |
| `float` | 64-bit float                                |
| `bool`  | `true` or `false`                           |
| `part`  | a reference to a part, which may disappear  |

Component references are declared with `comp create`. Labels are
declared with `label`.

## Names

Names use `A-Z a-z 0-9 _`. A name cannot be a number, `true`, `false`,
`this` or an instruction word. Wrapping a name in braces when it is
declared, `{limit}`, makes the variable readonly; nothing may `set` it.

## Instructions

<pre><code>var &lt;type&gt; &lt;name&gt; &lt;value&gt;
set &lt;name&gt; &lt;value&gt;
label &lt;name&gt;
jump &lt;label&gt; &lt;condition&gt;
stop
</code></pre>

`var` declares a variable and assigns it every time the line runs.
`set` assigns. For `int`, `float` and `bool` the value is an expression
that is converted to the variable's type. For `part` the value must be
another `part` variable.

`jump` continues at the line after `label` when the condition is true.
The condition must be a `bool`. `stop` halts the processor.

<pre><code>var int n 0
label again
set n n+1
jump again n&lt;3
</code></pre>

## Expressions

Integers, floats, `true` and `false`, variable names and these operators,
from lowest to highest precedence:
`or ||`, `and &&`, `= == <> !=`, `< <= > >=`, `+ -`, `* / %`,
unary `- not !`.

Integer arithmetic that overflows is an error. `/` always gives a float.
Mixing integers and floats gives a float.

Functions: `abs ceiling floor round truncate sign sqrt exp log log10 pow
sin cos tan asin acos atan max min random() if(cond, then, else)`.
`log` takes an optional base. `if` only evaluates the branch it picks.

A `part` or component variable used in an expression stands for its
entity id.

## Function-call instructions

<pre><code>&lt;instruction&gt; &lt;name&gt;(&lt;arg&gt;, &lt;arg&gt;) &lt;result&gt;
</code></pre>

Arguments are separated by a comma and one space. There are no other
spaces outside brackets and double quotes. `"text"` is a string.
`'c'` reads the integer variable `c` as a character.

### time

| call                               | result                     |
|------------------------------------|----------------------------|
| `time frames_since_launch() f`     | frames, `int` or `float`   |
| `time seconds_since_launch() s`    | seconds, `float`           |
| `time delta_time() d`              | seconds since last frame   |
| `time wait(n)`                     | skip the next `n` frames   |

### console

Every processor has an input and an output buffer.

| call                         | effect                                          |
|------------------------------|-------------------------------------------------|
| `console read()`             | append host input to the input buffer           |
| `console write()`            | hand the output buffer to the host              |
| `console push(a, b, ...)`    | append text; whole floats print without `.0`    |
| `console pop() n`            | take the first number from the input buffer     |
| `console pop() 'c'`          | take one character code into `c`                |
| `console can_pop(n) b`       | would `pop` succeed                             |
| `console clear("in")`        | empty a buffer, also `clear_in()` `clear_out()` |

### memory

`memory` addresses the processor's own memory, `memory m.` a memory
component held in `m`.

<pre><code>memory set(2, 42)
memory get(2) v
memory get_type(2) t
memory is_null(2) e
memory clear(2)
</code></pre>

### comp

<pre><code>comp create("m", "memory")
comp this.get_component("memory", 0) m
comp m.size() n
</code></pre>

`comp create` declares a variable for one component type. Other calls
invoke a method on the part or component a variable holds. The target
must be in the processor's own group, or both groups must carry an
antenna.

*/
